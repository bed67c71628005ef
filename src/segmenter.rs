use std::collections::HashMap;

use log::trace;

use crate::edits::MAX_SPLIT;
use crate::wordbag::WordBag;

/// Maximum-probability word segmentation backed by a [`WordBag`].
///
/// Results are memoized per substring for as long as the segmenter lives, or
/// until [`clear_cache`](Segmenter::clear_cache) is called.
#[derive(Debug)]
pub struct Segmenter<'a> {
    bag: &'a WordBag,
    memo: HashMap<String, Segmentation>,
}

/// A split of a run into words, with the product of their frequencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub words: Vec<String>,
    pub probability: f64,
}

impl Segmentation {
    fn empty() -> Self {
        Self {
            words: Vec::new(),
            probability: 1.0,
        }
    }
}

impl<'a> Segmenter<'a> {
    pub fn new(bag: &'a WordBag) -> Self {
        Self {
            bag,
            memo: HashMap::new(),
        }
    }

    /// Split `run` into the most probable sequence of words.
    ///
    /// The first word of every candidate split is at most 20 letters long.
    /// Among equally probable splits the one with the shortest first word
    /// wins.
    pub fn segment(&mut self, run: &str) -> Vec<String> {
        self.best(run).words
    }

    /// Same as [`segment`](Self::segment), also returning the probability.
    pub fn best(&mut self, run: &str) -> Segmentation {
        if run.is_empty() {
            return Segmentation::empty();
        }
        if let Some(cached) = self.memo.get(run) {
            return cached.clone();
        }

        trace!("segmenting {:?}", run);

        let mut best: Option<Segmentation> = None;
        for split in 1..=run.len().min(MAX_SPLIT) {
            if !run.is_char_boundary(split) {
                continue;
            }
            let (first, rest) = run.split_at(split);
            let rest = self.best(rest);
            let probability = self.bag.frequency(first) * rest.probability;

            if best.as_ref().map_or(true, |b| probability > b.probability) {
                let mut words = Vec::with_capacity(rest.words.len() + 1);
                words.push(first.to_owned());
                words.extend(rest.words);
                best = Some(Segmentation { words, probability });
            }
        }

        let best = best.unwrap_or_else(|| Segmentation {
            words: vec![run.to_owned()],
            probability: 0.0,
        });
        self.memo.insert(run.to_owned(), best.clone());
        best
    }

    /// Forget every memoized segmentation.
    pub fn clear_cache(&mut self) {
        self.memo.clear();
    }

    /// Number of memoized substrings.
    pub fn cache_len(&self) -> usize {
        self.memo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag() -> WordBag {
        vec![("the", 1000), ("quick", 500), ("a", 10)]
            .into_iter()
            .collect()
    }

    #[test]
    fn splits_run_into_known_words() {
        let bag = bag();
        let mut segmenter = Segmenter::new(&bag);
        assert_eq!(segmenter.segment("thequick"), vec!["the", "quick"]);
    }

    #[test]
    fn empty_run_has_identity_probability() {
        let bag = bag();
        let mut segmenter = Segmenter::new(&bag);
        assert!(segmenter.segment("").is_empty());
        assert_eq!(segmenter.best("").probability, 1.0);
    }

    #[test]
    fn unknown_runs_fall_back_to_leftmost_split() {
        let bag = bag();
        let mut segmenter = Segmenter::new(&bag);
        let best = segmenter.best("xyz");
        assert_eq!(best.probability, 0.0);
        assert_eq!(best.words, vec!["x", "y", "z"]);
    }

    #[test]
    fn probability_is_product_of_frequencies() {
        let bag = bag();
        let mut segmenter = Segmenter::new(&bag);
        let best = segmenter.best("quickthe");
        let expected = bag.frequency("quick") * bag.frequency("the");
        assert!((best.probability - expected).abs() < 1e-12);
    }

    #[test]
    fn long_runs_cap_the_first_word() {
        let long: String = "a".repeat(25);
        let bag: WordBag = vec![(long.as_str(), 1000), ("a", 1)].into_iter().collect();
        let mut segmenter = Segmenter::new(&bag);
        let words = segmenter.segment(&long);
        assert!(words.iter().all(|w| w.len() <= 20));
    }

    #[test]
    fn cache_can_be_cleared() {
        let bag = bag();
        let mut segmenter = Segmenter::new(&bag);
        segmenter.segment("thequick");
        assert!(segmenter.cache_len() > 0);
        segmenter.clear_cache();
        assert_eq!(segmenter.cache_len(), 0);
    }
}
