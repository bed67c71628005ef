use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::io::{BufReader, Read, Write};
use std::iter::FromIterator;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{ModelLoadingError, ModelSavingError};
use crate::tokenizer::Tokenizer;

/// Whole-word occurrence counts.
///
/// Stored on disk as a flat JSON object mapping words to counts.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(from = "HashMap<String, u64>", into = "HashMap<String, u64>")]
pub struct WordBag {
    counts: HashMap<String, u64>,
    total: u64,
}

impl WordBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a bag previously written by [`save_to_file`](Self::save_to_file)
    /// or produced by any other tool using the same format.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadingError> {
        let file = File::open(path.as_ref())?;
        let bag: Self = serde_json::from_reader(BufReader::new(file))?;

        info!("loaded {} words from {}", bag.len(), path.as_ref().display());

        Ok(bag)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelSavingError> {
        let serialized = serde_json::to_string(&self.counts)?;
        File::create(path)?.write_all(serialized.as_bytes())?;

        Ok(())
    }

    /// Count every word of `source`.
    pub fn feed<R: Read>(&mut self, source: R) -> io::Result<&mut Self> {
        for word in Tokenizer::new(source) {
            let (word, _) = word?;
            self.add(&word, 1);
        }

        Ok(self)
    }

    pub fn add(&mut self, word: &str, count: u64) -> &mut Self {
        if let Some(existing) = self.counts.get_mut(word) {
            *existing += count;
        } else {
            self.counts.insert(word.to_owned(), count);
        }
        self.total += count;

        self
    }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Relative frequency of `word`, zero for unknown words or an empty bag.
    pub fn frequency(&self, word: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(word) as f64 / self.total as f64
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl From<HashMap<String, u64>> for WordBag {
    fn from(counts: HashMap<String, u64>) -> Self {
        let total = counts.values().sum();
        Self { counts, total }
    }
}

impl From<WordBag> for HashMap<String, u64> {
    fn from(bag: WordBag) -> Self {
        bag.counts
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for WordBag {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut bag = WordBag::new();
        for (word, count) in iter {
            bag.add(word.as_ref(), count);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_is_relative_to_total() {
        let bag: WordBag = vec![("the", 1000), ("quick", 500)].into_iter().collect();
        assert_eq!(bag.total(), 1500);
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.frequency("quick"), 500.0 / 1500.0);
        assert_eq!(bag.frequency("fox"), 0.0);
        assert_eq!(WordBag::new().frequency("the"), 0.0);
    }

    #[test]
    fn feeding_counts_tokens() {
        let mut bag = WordBag::new();
        bag.feed("The cat saw the other CAT.".as_bytes()).unwrap();
        assert_eq!(bag.count("the"), 2);
        assert_eq!(bag.count("cat"), 2);
        assert_eq!(bag.count("saw"), 1);
        assert_eq!(bag.total(), 6);
    }

    #[test]
    fn deserializes_flat_object() {
        let bag: WordBag = serde_json::from_str(r#"{"the": 3, "fox": 1}"#).unwrap();
        assert_eq!(bag.total(), 4);
        assert_eq!(bag.count("fox"), 1);
        assert_eq!(serde_json::to_value(&bag).unwrap()["the"], 3);
    }
}
