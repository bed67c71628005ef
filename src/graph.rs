use std::fmt;
use std::fs;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{InvalidOrders, ModelLoadingError, ModelSavingError};
use crate::tokenizer::Tokenizer;

/// Observed successors of one k-gram.
///
/// The total is kept next to the per-symbol counts and written out under the
/// `ALL` key, which can never clash with a one-letter symbol key.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Transitions {
    #[serde(rename = "ALL")]
    total: u64,
    #[serde(flatten)]
    symbols: IndexMap<char, u64>,
}

impl Transitions {
    fn add(&mut self, symbol: char) {
        *self.symbols.entry(symbol).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self, symbol: char) -> u64 {
        self.symbols.get(&symbol).copied().unwrap_or(0)
    }

    pub fn symbols(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.symbols.iter().map(|(&symbol, &count)| (symbol, count))
    }

    fn is_consistent(&self) -> bool {
        self.symbols.values().sum::<u64>() == self.total
    }
}

/// Character-level Markov graph over k-grams of one or more orders.
///
/// All orders share a single table; k-grams of different lengths are
/// different keys so they never collide.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MarkovGraph {
    orders: Vec<usize>,
    graph: IndexMap<String, Transitions>,
}

impl MarkovGraph {
    /// Create an empty graph trained with the given k-gram orders.
    pub fn new(orders: &[usize]) -> Result<Self, InvalidOrders> {
        validate_orders(orders)?;

        Ok(Self {
            orders: orders.to_vec(),
            graph: IndexMap::new(),
        })
    }

    /// Build a graph from a previously saved snapshot.
    pub fn from_dump<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadingError> {
        let file = File::open(path.as_ref())?;
        let graph: Self = serde_json::from_reader(BufReader::new(file))?;
        graph.validate()?;

        info!(
            "loaded {} k-grams with orders {:?} from {}",
            graph.len(),
            graph.orders,
            path.as_ref().display()
        );

        Ok(graph)
    }

    /// Replace orders and counts with the contents of a snapshot.
    ///
    /// On error the graph is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ModelLoadingError> {
        *self = Self::from_dump(path)?;
        Ok(())
    }

    /// Write the snapshot to `path`.
    ///
    /// A snapshot already living at `path` is first copied next to it as
    /// `<unix seconds>.<nanoseconds>.<file name>`, whose path is returned.
    /// An existing backup is never overwritten. The new snapshot
    /// is written to a temporary file and renamed into place.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<Option<PathBuf>, ModelSavingError> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "snapshot path has no file name")
        })?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let backup = if path.is_file() {
            let backup = preserve(path, &directory, &file_name.to_string_lossy())?;
            info!("previous model preserved as {}", backup.display());
            Some(backup)
        } else {
            None
        };

        let serialized = serde_json::to_string(&self)?;
        let temporary = directory.join(format!(".{}.tmp", file_name.to_string_lossy()));
        {
            let mut file = File::create(&temporary)?;
            file.write_all(serialized.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temporary, path)?;

        info!("saved {} k-grams to {}", self.len(), path.display());

        Ok(backup)
    }

    pub fn orders(&self) -> &[usize] {
        &self.orders
    }

    /// Number of distinct k-grams observed so far.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn transitions(&self, kgram: &str) -> Option<&Transitions> {
        self.graph.get(kgram)
    }

    /// Iterate over all k-grams and their successors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Transitions)> {
        self.graph.iter().map(|(kgram, transitions)| (kgram.as_str(), transitions))
    }

    /// Count every transition found in the words of `source`.
    pub fn feed<R: Read>(&mut self, source: R) -> io::Result<&mut Self> {
        for word in Tokenizer::new(source) {
            let (word, _) = word?;
            self.feed_word(&word);
        }

        Ok(self)
    }

    /// Like [`feed`](Self::feed) with an explicit read chunk size.
    pub fn feed_chunked<R: Read>(&mut self, source: R, chunk_size: usize) -> io::Result<&mut Self> {
        for word in Tokenizer::with_chunk_size(source, chunk_size) {
            let (word, _) = word?;
            self.feed_word(&word);
        }

        Ok(self)
    }

    /// Train on the contents of a single file.
    pub fn feed_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<&mut Self> {
        self.feed(File::open(path)?)
    }

    /// Count the transitions of a single lowercase ASCII word. Anything
    /// else is ignored.
    pub fn feed_word(&mut self, word: &str) -> &mut Self {
        if !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return self;
        }

        let length = word.len();
        for &order in &self.orders {
            if length < order {
                continue;
            }
            for i in 0..length - order {
                let kgram = &word[i..i + order];
                let symbol = word.as_bytes()[i + order] as char;
                add_transition(&mut self.graph, kgram, symbol);
            }
        }

        self
    }

    /// Smoothed probability of `symbol` following `kgram`.
    ///
    /// Add-one smoothing over the k-gram's total; when the k-gram was never
    /// seen, the number of distinct k-grams stands in for the total. The
    /// result is clamped into `(0, 1]`.
    pub fn frequency(&self, kgram: &str, symbol: char) -> f64 {
        let (count, denominator) = match self.graph.get(kgram) {
            Some(transitions) => (transitions.count(symbol), transitions.total),
            None => (0, self.graph.len() as u64),
        };

        ((count + 1) as f64 / denominator.max(1) as f64).min(1.0)
    }

    /// Total number of observed transitions out of `kgram`.
    pub fn total(&self, kgram: &str) -> u64 {
        self.graph.get(kgram).map_or(0, Transitions::total)
    }

    /// Draw a successor of `kgram` with probability proportional to its
    /// count. Returns `None` for unseen k-grams.
    pub fn sample_next<G: Rng>(&self, kgram: &str, rng: &mut G) -> Option<char> {
        let transitions = self.graph.get(kgram)?;
        if transitions.total == 0 {
            return None;
        }

        let mut r = rng.random_range(0..transitions.total);
        for (symbol, count) in transitions.symbols() {
            if r < count {
                return Some(symbol);
            }
            r -= count;
        }

        None
    }

    fn validate(&self) -> Result<(), ModelLoadingError> {
        validate_orders(&self.orders)?;

        if let Some((kgram, _)) = self.graph.iter().find(|(_, t)| !t.is_consistent()) {
            return Err(ModelLoadingError::InconsistentTotal {
                kgram: kgram.clone(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for MarkovGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (kgram, transitions) in &self.graph {
            write!(f, "{}: {{ALL: {}", kgram, transitions.total)?;
            for (symbol, count) in transitions.symbols() {
                write!(f, ", {}: {}", symbol, count)?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// Copy `path` to a fresh timestamped file in `directory`.
fn preserve(path: &Path, directory: &Path, file_name: &str) -> io::Result<PathBuf> {
    loop {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let backup = directory.join(format!(
            "{}.{:09}.{}",
            elapsed.as_secs(),
            elapsed.subsec_nanos(),
            file_name
        ));

        let mut target = match OpenOptions::new().write(true).create_new(true).open(&backup) {
            Ok(target) => target,
            // clock did not advance since the last backup
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        };
        io::copy(&mut File::open(path)?, &mut target)?;
        target.sync_all()?;

        return Ok(backup);
    }
}

fn add_transition(graph: &mut IndexMap<String, Transitions>, kgram: &str, symbol: char) {
    // avoid allocating a key for k-grams that are already known
    if let Some(transitions) = graph.get_mut(kgram) {
        transitions.add(symbol);
        return;
    }

    let mut transitions = Transitions::default();
    transitions.add(symbol);
    graph.insert(kgram.to_owned(), transitions);
}

fn validate_orders(orders: &[usize]) -> Result<(), InvalidOrders> {
    if orders.is_empty() {
        Err(InvalidOrders::Empty)
    } else if orders.contains(&0) {
        Err(InvalidOrders::Zero)
    } else {
        Ok(())
    }
}
