//! Detect and repair malformed words using a character-level k-gram model.
//!
//! A [`MarkovGraph`] counts which letter follows every k-gram of a training
//! corpus. Together with a [`WordBag`] of whole-word frequencies it lets a
//! [`Corrector`] decide whether a word looks like real text, and if it does
//! not, replace it with the most frequent word within two edits or split it
//! into several known words.
//!
//! # Usage
//!
//! ```
//! use kgram_speller::{MarkovGraph, TextCorrector, WordBag};
//!
//! let mut graph = MarkovGraph::new(&[3]).unwrap();
//! graph.feed("the quick brown fox".as_bytes()).unwrap();
//!
//! let bag: WordBag = vec![("the", 1000), ("quick", 500)].into_iter().collect();
//!
//! let mut checker = TextCorrector::new(&graph, &bag);
//! assert_eq!(checker.check_text("Teh fox"), "The fox");
//! ```
//!
//! # Training
//!
//! Use [`ModelTrainer`] to build both a graph and a word bag from a corpus,
//! then save them for later use:
//!
//! ```no_run
//! use kgram_speller::{ModelTrainer, TrainingConfig};
//!
//! let mut trainer = ModelTrainer::new(&TrainingConfig::default()).unwrap();
//! trainer.add_directory("corpus").unwrap();
//!
//! let (graph, bag) = trainer.into_model();
//! graph.save("model.json").unwrap();
//! bag.save_to_file("bag.json").unwrap();
//! ```
//!
//! A previously saved model is loaded with [`MarkovGraph::from_dump`] and
//! [`WordBag::load_from_file`].

mod config;
mod corrector;
mod edits;
mod errors;
mod graph;
mod segmenter;
mod text;
mod tokenizer;
mod trainer;
mod utils;
mod wordbag;

pub use crate::config::{Config, CorrectorConfig, TrainingConfig};
pub use crate::corrector::{Correction, Corrector};
pub use crate::edits::{edits1, edits_n};
pub use crate::errors::{InvalidOrders, ModelLoadingError, ModelSavingError};
pub use crate::graph::{MarkovGraph, Transitions};
pub use crate::segmenter::{Segmentation, Segmenter};
pub use crate::text::TextCorrector;
pub use crate::tokenizer::{tokenize, Tokenizer, Word, DEFAULT_CHUNK_SIZE};
pub use crate::trainer::ModelTrainer;
pub use crate::wordbag::WordBag;
