//! Drive a recognizer over an ordered list of clips.

use crate::config::ParseMode;
use crate::error::{RecognitionError, Result, TrackError};
use crate::track::SubtitleTrack;
use crate::traits::Recognizer;
use crate::types::SegmentRecognitionResult;
use std::path::Path;

/// Transcribe clips in order and pair each track with the clip's real duration.
///
/// Output with no subtitle blocks becomes an empty segment, which stitching skips.
///
/// # Errors
///
/// - [`RecognitionError`] naming the segment if transcription or the duration query fails
/// - [`TrackError::MalformedBlock`] in strict mode
pub fn recognize_segments<R, P>(
    recognizer: &R,
    clips: &[P],
    language: &str,
    mode: ParseMode,
) -> Result<Vec<SegmentRecognitionResult>>
where
    R: Recognizer + ?Sized,
    P: AsRef<Path>,
{
    clips
        .iter()
        .zip(1..)
        .map(|(clip, segment)| recognize_one(recognizer, clip.as_ref(), segment, language, mode))
        .collect()
}

fn recognize_one<R: Recognizer + ?Sized>(
    recognizer: &R,
    clip: &Path,
    segment: usize,
    language: &str,
    mode: ParseMode,
) -> Result<SegmentRecognitionResult> {
    let error = |e: crate::traits::BoxError| RecognitionError {
        segment,
        clip: clip.to_path_buf(),
        message: e.to_string(),
    };

    tracing::debug!(segment, clip = ?clip.display(), "transcribing clip");

    let raw = recognizer.transcribe(clip, language).map_err(error)?;
    let duration_ms = recognizer.duration_ms(clip).map_err(error)?;

    let track = match SubtitleTrack::parse_with(&raw, mode) {
        Ok(track) => track,
        Err(TrackError::Empty) => {
            tracing::warn!(segment, clip = ?clip.display(), "recognizer returned no subtitles");
            SubtitleTrack::default()
        }
        Err(e) => return Err(e.into()),
    };

    Ok(SegmentRecognitionResult::new(track, duration_ms))
}
