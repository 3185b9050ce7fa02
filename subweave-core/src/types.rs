//! Core types for subweave-core

use crate::time::Timestamp;
use crate::track::SubtitleTrack;

/// One subtitle cue.
///
/// `index` is 1-based and derived from the entry's position in its track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtitleEntry {
    /// Position in the owning track (1-based)
    pub index: usize,
    /// Start time
    pub start: Timestamp,
    /// End time, never before `start`
    pub end: Timestamp,
    /// Cue text, non-blank lines joined with `\n`
    pub text: String,
}

impl SubtitleEntry {
    /// Create an unnumbered entry; the owning track assigns its index.
    ///
    /// An `end` before `start` is clamped to `start`, and blank text lines are
    /// dropped.
    pub fn new(text: impl AsRef<str>, start: Timestamp, end: Timestamp) -> Self {
        Self {
            index: 0,
            start,
            end: end.max(start),
            text: normalize_text(text.as_ref()),
        }
    }
}

/// Drop blank lines from cue text; in SRT a blank line ends the block.
pub(crate) fn normalize_text(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recognition output for one audio clip.
///
/// Timestamps in `track` are relative to the clip's own start.
#[derive(Clone, Debug)]
pub struct SegmentRecognitionResult {
    /// Parsed recognizer output (may be empty)
    pub track: SubtitleTrack,
    /// Real clip duration in milliseconds
    pub duration_ms: u64,
}

impl SegmentRecognitionResult {
    pub fn new(track: SubtitleTrack, duration_ms: u64) -> Self {
        Self { track, duration_ms }
    }
}
