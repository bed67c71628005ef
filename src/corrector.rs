use log::debug;

use crate::config::CorrectorConfig;
use crate::edits::edits_n;
use crate::graph::MarkovGraph;
use crate::segmenter::Segmenter;
use crate::utils::{join_with_spaces, CasePattern};
use crate::wordbag::WordBag;

/// How a word was handled by [`Corrector::suggest`].
#[derive(Debug, Clone, PartialEq)]
pub enum Correction {
    /// The word looks like valid text and is kept.
    Plausible { score: f64 },
    /// The word is replaced by a single word (possibly itself).
    Word { word: String, frequency: f64 },
    /// The word is split into several words.
    Split { words: Vec<String>, frequency: f64 },
}

impl Correction {
    /// The replacement for `original`, with split words joined by spaces.
    /// Plausible words are returned as they are, repairs in lowercase.
    pub fn text(&self, original: &str) -> String {
        match self {
            Correction::Plausible { .. } => original.to_owned(),
            Correction::Word { word, .. } => word.clone(),
            Correction::Split { words, .. } => join_with_spaces(words.iter()),
        }
    }
}

/// Single-word spelling corrector.
///
/// Holds read-only references to a trained [`MarkovGraph`] and a [`WordBag`]
/// and owns the segmentation cache for one correction session.
pub struct Corrector<'a> {
    graph: &'a MarkovGraph,
    bag: &'a WordBag,
    segmenter: Segmenter<'a>,
    config: CorrectorConfig,
}

impl<'a> Corrector<'a> {
    pub fn new(graph: &'a MarkovGraph, bag: &'a WordBag) -> Self {
        Self::with_config(graph, bag, CorrectorConfig::default())
    }

    pub fn with_config(graph: &'a MarkovGraph, bag: &'a WordBag, config: CorrectorConfig) -> Self {
        Self {
            graph,
            bag,
            segmenter: Segmenter::new(bag),
            config,
        }
    }

    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    /// Product of the smoothed transition frequencies of `word` over all
    /// orders, or `None` when the word is not longer than any order (or is
    /// not ASCII).
    pub fn plausibility(&self, word: &str) -> Option<f64> {
        if !word.is_ascii() {
            return None;
        }

        let word = word.to_ascii_lowercase();
        let length = word.len();
        let orders = self.graph.orders();

        if orders.iter().all(|&order| order >= length) {
            return None;
        }

        let mut score = 1.0;
        for &order in orders {
            if order >= length {
                continue;
            }
            for i in 0..length - order {
                let kgram = &word[i..i + order];
                let symbol = word.as_bytes()[i + order] as char;
                score *= self.graph.frequency(kgram, symbol);
            }
        }

        Some(score)
    }

    /// Whether `word` scores above the plausibility threshold.
    pub fn looks_like_word(&self, word: &str) -> bool {
        self.plausibility(word)
            .map_or(false, |score| score > self.config.plausibility_threshold)
    }

    /// Decide how to handle `word`. Empty words and words with anything but
    /// ASCII letters in them are kept as they are.
    pub fn suggest(&mut self, word: &str) -> Correction {
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Correction::Word {
                word: word.to_owned(),
                frequency: 0.0,
            };
        }

        if let Some(score) = self.plausibility(word) {
            if score > self.config.plausibility_threshold {
                return Correction::Plausible { score };
            }
        }

        let lowercase = word.to_ascii_lowercase();
        let (single, single_frequency) = self.best_single_word(&lowercase);

        let split = self.segmenter.best(&lowercase);
        let split_frequency: f64 = split.words.iter().map(|w| self.bag.frequency(w)).sum();

        debug!(
            "{:?}: word {:?} ({}), split {:?} ({})",
            word, single, single_frequency, split.words, split_frequency
        );

        if split_frequency > single_frequency {
            Correction::Split {
                words: split.words,
                frequency: split_frequency,
            }
        } else {
            Correction::Word {
                word: single,
                frequency: single_frequency,
            }
        }
    }

    /// Correct a single word, keeping the casing of the original.
    ///
    /// Anything that is not a run of ASCII letters is returned unchanged.
    pub fn correct(&mut self, word: &str) -> String {
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_alphabetic()) {
            return word.to_owned();
        }

        match self.suggest(word) {
            Correction::Plausible { .. } => word.to_owned(),
            correction => CasePattern::of(word).apply(&correction.text(word)),
        }
    }

    /// Forget memoized segmentations.
    pub fn clear_cache(&mut self) {
        self.segmenter.clear_cache();
    }

    pub fn cache_len(&self) -> usize {
        self.segmenter.cache_len()
    }

    /// The word itself if it is frequent enough, otherwise its most frequent
    /// neighbour within the configured edit distance. Equally frequent
    /// neighbours resolve to the lexicographically smallest one. If no
    /// neighbour is known at all, the word is kept with frequency zero.
    fn best_single_word(&self, word: &str) -> (String, f64) {
        let frequency = self.bag.frequency(word);
        if frequency > self.config.min_word_frequency {
            return (word.to_owned(), frequency);
        }

        let mut best: Option<(String, f64)> = None;
        for candidate in edits_n(word, self.config.max_edit_distance) {
            let frequency = self.bag.frequency(&candidate);
            if frequency <= 0.0 {
                continue;
            }
            let better = match &best {
                None => true,
                Some((current, best_frequency)) => {
                    frequency > *best_frequency
                        || (frequency == *best_frequency && candidate < *current)
                }
            };
            if better {
                best = Some((candidate, frequency));
            }
        }

        best.unwrap_or_else(|| (word.to_owned(), 0.0))
    }
}
