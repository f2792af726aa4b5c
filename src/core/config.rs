/// Generation settings, loadable from a RON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Corpus used when no input files are given.
pub const DEFAULT_CORPUS: &str = "corpus/moby_dick.txt";
pub const DEFAULT_PREFIX_LEN: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("prefix length must be at least one (got {0})")]
    InvalidPrefixLength(usize),
    #[error("poem count must be at least one")]
    InvalidCount,
    #[error("attempt ceiling must be at least one")]
    InvalidMaxAttempts,
}

/// Settings for a generation session.
///
/// ```ron
/// (
///     inputs: ["corpus/moby_dick.txt"],
///     prefix_len: 2,
///     dictionary: Some("cmudict.dict"),
///     seed: Some(42),
///     max_attempts: None,
///     count: 3,
/// )
/// ```
///
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaikuConfig {
    /// Corpus files the chain is trained on.
    pub inputs: Vec<PathBuf>,
    /// Words per chain prefix.
    pub prefix_len: usize,
    /// CMU-format pronouncing dictionary. Spelling-based estimates are used
    /// when absent.
    pub dictionary: Option<PathBuf>,
    pub seed: Option<u64>,
    /// Ceiling on whole-poem attempts; unbounded when absent.
    pub max_attempts: Option<u32>,
    /// Number of poems to generate.
    pub count: usize,
}

impl Default for HaikuConfig {
    fn default() -> Self {
        Self {
            inputs: vec![PathBuf::from(DEFAULT_CORPUS)],
            prefix_len: DEFAULT_PREFIX_LEN,
            dictionary: None,
            seed: None,
            max_attempts: None,
            count: 1,
        }
    }
}

impl HaikuConfig {
    pub fn parse_ron(contents: &str) -> Result<Self, ConfigError> {
        let config: HaikuConfig = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix_len < 1 {
            return Err(ConfigError::InvalidPrefixLength(self.prefix_len));
        }
        if self.count < 1 {
            return Err(ConfigError::InvalidCount);
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::InvalidMaxAttempts);
        }
        Ok(())
    }
}
