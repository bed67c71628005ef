use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::TrainingConfig;
use crate::errors::InvalidOrders;
use crate::graph::MarkovGraph;
use crate::tokenizer::Tokenizer;
use crate::wordbag::WordBag;

/// Trainer for new k-gram models.
///
/// Feeds a corpus into a [`MarkovGraph`] and, on the same pass, into a
/// [`WordBag`] of whole-word counts.
/// See [crate documentation](index.html) for examples.
#[derive(Debug)]
pub struct ModelTrainer {
    graph: MarkovGraph,
    bag: WordBag,
    chunk_size: usize,
}

impl ModelTrainer {
    /// Create a trainer for a fresh graph.
    pub fn new(config: &TrainingConfig) -> Result<Self, InvalidOrders> {
        Ok(Self::with_model(
            MarkovGraph::new(&config.orders)?,
            WordBag::new(),
            config.chunk_size,
        ))
    }

    /// Continue training an existing model, e.g. one loaded from disk.
    pub fn with_model(graph: MarkovGraph, bag: WordBag, chunk_size: usize) -> Self {
        Self {
            graph,
            bag,
            chunk_size,
        }
    }

    /// Add every word of `source` to the training set.
    pub fn add_source<R: Read>(&mut self, source: R) -> io::Result<&mut Self> {
        for word in Tokenizer::with_chunk_size(source, self.chunk_size) {
            let (word, _) = word?;
            self.graph.feed_word(&word);
            self.bag.add(&word, 1);
        }

        Ok(self)
    }

    /// Add the words of a single file to the training set.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<&mut Self> {
        debug!("training on {}", path.as_ref().display());
        self.add_source(File::open(path)?)
    }

    /// Add every regular file of a directory to the training set.
    ///
    /// Files are visited in path order; subdirectories are not descended
    /// into. Returns the number of files read.
    pub fn add_directory<P: AsRef<Path>>(&mut self, dir: P) -> io::Result<usize> {
        let files = list_files(dir.as_ref())?;
        let file_count = files.len();

        for (processed, path) in files.iter().enumerate() {
            self.add_file(path)?;
            info!(
                "[{:.2}%] {}",
                (processed + 1) as f64 / file_count as f64 * 100.0,
                path.display()
            );
        }

        Ok(file_count)
    }

    pub fn graph(&self) -> &MarkovGraph {
        &self.graph
    }

    pub fn bag(&self) -> &WordBag {
        &self.bag
    }

    /// Finish training.
    pub fn into_model(self) -> (MarkovGraph, WordBag) {
        info!(
            "trained {} k-grams and {} distinct words",
            self.graph.len(),
            self.bag.len()
        );
        (self.graph, self.bag)
    }
}

fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
