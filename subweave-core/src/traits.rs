//! Capability traits injected into the pipeline.
//!
//! The core never performs network or process I/O itself. Vendor bindings
//! implement these traits and are handed in by the caller.

use std::path::Path;

/// Error returned by an external capability.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Speech recognition for one audio clip.
pub trait Recognizer {
    /// Transcribe a clip into raw SRT text with clip-relative timestamps.
    fn transcribe(&self, clip: &Path, language: &str) -> Result<String, BoxError>;

    /// Real duration of a clip in milliseconds.
    fn duration_ms(&self, clip: &Path) -> Result<u64, BoxError>;
}

/// Text correction for one batch of subtitle lines.
///
/// Implementations must be shareable across worker threads.
pub trait CorrectionService: Send + Sync {
    /// Correct `lines` against `reference`.
    ///
    /// Should return exactly one line per input line, in the same order.
    /// A different count is treated as a failed batch by the caller.
    fn correct(&self, lines: &[String], reference: &str) -> Result<Vec<String>, BoxError>;
}

impl<T: CorrectionService + ?Sized> CorrectionService for &T {
    fn correct(&self, lines: &[String], reference: &str) -> Result<Vec<String>, BoxError> {
        (**self).correct(lines, reference)
    }
}

impl<T: CorrectionService + ?Sized> CorrectionService for Box<T> {
    fn correct(&self, lines: &[String], reference: &str) -> Result<Vec<String>, BoxError> {
        (**self).correct(lines, reference)
    }
}
