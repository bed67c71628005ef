//! Configuration value objects.
//!
//! All of these are plain immutable values handed to constructors. The CLI
//! reads a [`Config`] from a JSON file and overrides single fields from
//! command line flags.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ModelLoadingError;
use crate::tokenizer::DEFAULT_CHUNK_SIZE;

/// Parameters of the training phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// k-gram lengths the graph is trained with.
    pub orders: Vec<usize>,
    /// Number of bytes read from a corpus file at a time.
    pub chunk_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            orders: vec![3],
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Thresholds used by the [`Corrector`](crate::Corrector).
///
/// The default values were picked empirically for an English corpus and have
/// no deeper derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// A word whose plausibility score exceeds this is accepted as is.
    pub plausibility_threshold: f64,
    /// A word whose bag frequency exceeds this is its own best repair.
    pub min_word_frequency: f64,
    /// How many edits away single-word repair searches.
    pub max_edit_distance: usize,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig {
            plausibility_threshold: 0.0003,
            min_word_frequency: 0.0001,
            max_edit_distance: 2,
        }
    }
}

/// Everything the command line tool needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub training: TrainingConfig,
    pub corrector: CorrectorConfig,
    /// Canonical location of the model snapshot.
    pub model_path: PathBuf,
    /// Location of the word frequency bag.
    pub bag_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            training: TrainingConfig::default(),
            corrector: CorrectorConfig::default(),
            model_path: PathBuf::from("model.json"),
            bag_path: PathBuf::from("bag.json"),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadingError> {
        let mut string = String::new();
        File::open(path)?.read_to_string(&mut string)?;
        let config = serde_json::from_str(&string)?;

        Ok(config)
    }
}
