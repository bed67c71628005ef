use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::config::CorrectorConfig;
use crate::corrector::Corrector;
use crate::graph::MarkovGraph;
use crate::wordbag::WordBag;

lazy_static! {
    static ref LETTER_RUN: Regex = Regex::new(r"[A-Za-z]+").unwrap();
}

/// Applies a [`Corrector`] to every run of ASCII letters in a text.
pub struct TextCorrector<'a> {
    corrector: Corrector<'a>,
}

impl<'a> TextCorrector<'a> {
    pub fn new(graph: &'a MarkovGraph, bag: &'a WordBag) -> Self {
        Self::from(Corrector::new(graph, bag))
    }

    pub fn with_config(graph: &'a MarkovGraph, bag: &'a WordBag, config: CorrectorConfig) -> Self {
        Self::from(Corrector::with_config(graph, bag, config))
    }

    /// Correct every word of `text`. Everything between words is copied
    /// through untouched.
    pub fn check_text(&mut self, text: &str) -> String {
        let corrector = &mut self.corrector;
        LETTER_RUN
            .replace_all(text, |captures: &Captures| corrector.correct(&captures[0]))
            .into_owned()
    }

    /// Forget memoized segmentations, e.g. between unrelated texts.
    pub fn clear_cache(&mut self) {
        self.corrector.clear_cache();
    }

    pub fn corrector(&mut self) -> &mut Corrector<'a> {
        &mut self.corrector
    }
}

impl<'a> From<Corrector<'a>> for TextCorrector<'a> {
    fn from(corrector: Corrector<'a>) -> Self {
        Self { corrector }
    }
}
