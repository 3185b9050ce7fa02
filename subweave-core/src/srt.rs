//! SRT subtitle serialization.
//!
//! Converts subtitle tracks to and from SRT text. Block numbering is always
//! renormalized on output.

use crate::config::ParseMode;
use crate::error::TrackError;
use crate::track::SubtitleTrack;

/// Render a track as SRT file content.
pub fn to_text(track: &SubtitleTrack) -> String {
    track.render()
}

/// Parse SRT file content, skipping malformed blocks.
pub fn from_text(text: &str) -> Result<SubtitleTrack, TrackError> {
    SubtitleTrack::parse(text)
}

/// Parse SRT file content with an explicit leniency policy.
pub fn from_text_with(text: &str, mode: ParseMode) -> Result<SubtitleTrack, TrackError> {
    SubtitleTrack::parse_with(text, mode)
}

/// Display preview of a track (first and last entries).
pub fn preview(track: &SubtitleTrack, head_count: usize, tail_count: usize) -> String {
    let total = track.len();

    if total <= head_count + tail_count {
        return to_text(track);
    }

    let entries = track.entries();
    let head = SubtitleTrack::new(entries[..head_count].to_vec());
    let mut out = head.render();
    out.push_str("...\n\n");

    // render the tail with its original numbering
    for entry in &entries[total - tail_count..] {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            entry.index, entry.start, entry.end, entry.text
        ));
    }

    out
}
