//! Configuration types for parsing and correction.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Default correction batch size
const DEFAULT_BATCH_SIZE: BatchSize = BatchSize(20);

/// Default worker count (sequential)
const DEFAULT_WORKERS: usize = 1;

/// Leniency policy for malformed subtitle blocks.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Skip blocks that fail to parse
    #[default]
    Lenient,
    /// Fail on the first block that does not parse
    Strict,
}

/// Number of subtitle entries per correction batch.
///
/// Only 5, 10, 15, 20, 25 and 30 are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchSize(usize);

impl BatchSize {
    /// Recognized batch sizes
    pub const ALLOWED: [usize; 6] = [5, 10, 15, 20, 25, 30];

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        DEFAULT_BATCH_SIZE
    }
}

impl TryFrom<usize> for BatchSize {
    type Error = ConfigError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&size) {
            Ok(Self(size))
        } else {
            Err(ConfigError::InvalidBatchSize(size))
        }
    }
}

impl FromStr for BatchSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size: usize = s.parse().map_err(|e| format!("{e}"))?;
        Self::try_from(size).map_err(|e| e.to_string())
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference transcript slicing policy.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlignPolicy {
    /// Cut at proportional character offsets
    Proportional,
    /// Cut at the sentence boundary nearest each proportional offset
    #[default]
    Sentence,
}

/// Configuration for transcript-guided correction.
#[derive(clap::Args, Clone, Copy, Debug)]
pub struct CorrectionConfig {
    /// Subtitle entries per correction batch (5, 10, 15, 20, 25 or 30)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: BatchSize,

    /// Concurrent correction requests (1 = sequential)
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// How the reference transcript is sliced across batches
    #[arg(long, value_enum, default_value_t = AlignPolicy::default())]
    pub align: AlignPolicy,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
            align: AlignPolicy::default(),
        }
    }
}

impl CorrectionConfig {
    /// Create a sequential configuration with the given batch size.
    pub fn new(batch_size: BatchSize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    pub fn with_workers(self, workers: usize) -> Self {
        Self { workers, ..self }
    }

    /// Check settings that the type system does not enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkers(self.workers));
        }
        Ok(())
    }
}
