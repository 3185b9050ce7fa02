//! Error types for subweave-core organized by processing stage.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline error variants organized by processing stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration stage error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Timestamp codec error
    #[error(transparent)]
    Time(#[from] TimeError),

    /// Subtitle track error
    #[error(transparent)]
    Track(#[from] TrackError),

    /// Speech recognition stage error
    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    /// Transcript-guided correction stage error
    #[error(transparent)]
    Correction(#[from] CorrectionError),
}

/// Configuration errors (batch size, worker pool, alignment policy).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Batch size outside the recognized set
    #[error("invalid batch size: {0} (expected one of 5, 10, 15, 20, 25, 30)")]
    InvalidBatchSize(usize),

    /// Worker count must be at least one
    #[error("invalid worker count: {0} (minimum 1)")]
    InvalidWorkers(usize),

    /// Reference aligner returned the wrong number of slices
    #[error("reference aligner produced {got} slices for {expected} batches")]
    AlignerMismatch { expected: usize, got: usize },
}

/// Timestamp parsing and formatting errors.
#[derive(Debug, Error)]
pub enum TimeError {
    /// Text does not match `HH:MM:SS,mmm` or a field is out of range
    #[error("malformed timestamp: {text:?}")]
    Malformed { text: String },

    /// Millisecond value is negative or overflows
    #[error("invalid timestamp: {ms}ms")]
    Invalid { ms: i128 },
}

/// Subtitle track errors.
#[derive(Debug, Error)]
pub enum TrackError {
    /// No subtitle block could be parsed
    #[error("subtitle track is empty")]
    Empty,

    /// A block failed to parse in strict mode
    #[error("malformed subtitle block {block}: {reason}")]
    MalformedBlock { block: usize, reason: String },
}

/// Recognition capability failure for one segment.
#[derive(Debug, Error)]
#[error("recognition failed for segment {segment} ({clip:?}): {message}")]
pub struct RecognitionError {
    /// 1-based segment position
    pub segment: usize,
    pub clip: PathBuf,
    pub message: String,
}

/// Transcript-guided correction errors.
#[derive(Debug, Error)]
pub enum CorrectionError {
    /// Service returned a different number of lines than the batch holds
    #[error("batch {batch}: expected {expected} corrected lines, got {got}")]
    Mismatch {
        batch: usize,
        expected: usize,
        got: usize,
    },

    /// Correction service call failed
    #[error("batch {batch}: correction service failed: {message}")]
    Service { batch: usize, message: String },

    /// Every batch failed
    #[error("correction failed for all {batches} batches")]
    Failed { batches: usize },
}

/// Result type alias for subweave-core operations.
pub type Result<T> = std::result::Result<T, Error>;
