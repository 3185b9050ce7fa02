//! Stitch per-segment recognition results into one timeline.

use crate::error::{Result, TimeError, TrackError};
use crate::track::SubtitleTrack;
use crate::types::{SegmentRecognitionResult, SubtitleEntry};

/// Accumulated timeline while folding over segments.
#[derive(Debug, Default)]
struct Timeline {
    entries: Vec<SubtitleEntry>,
    /// End of the last non-empty segment in milliseconds
    offset: u64,
}

/// Merge segments, in order, into a single track.
///
/// Each non-empty segment is rescaled to its real clip duration, then shifted to
/// start at the end of the previous non-empty segment. Empty segments are skipped
/// without moving the offset.
///
/// # Errors
///
/// Returns [`TrackError::Empty`] if no segment contributes an entry.
pub fn stitch<I>(segments: I) -> Result<SubtitleTrack>
where
    I: IntoIterator<Item = SegmentRecognitionResult>,
{
    let timeline = segments
        .into_iter()
        .zip(1..)
        .try_fold(Timeline::default(), append_segment)?;

    if timeline.entries.is_empty() {
        return Err(TrackError::Empty.into());
    }

    tracing::info!(
        entries = timeline.entries.len(),
        end_ms = timeline.offset,
        "stitched segments"
    );

    Ok(SubtitleTrack::new(timeline.entries))
}

fn append_segment(
    mut timeline: Timeline,
    (segment, position): (SegmentRecognitionResult, usize),
) -> Result<Timeline> {
    if segment.track.is_empty() {
        tracing::warn!(segment = position, "skipping empty segment");
        return Ok(timeline);
    }

    let offset = i64::try_from(timeline.offset).map_err(|_| TimeError::Invalid {
        ms: timeline.offset.into(),
    })?;

    let placed = segment.track.rescale(segment.duration_ms).shift(offset)?;

    if let Some(last) = placed.last() {
        timeline.offset = last.end.as_millis();
    }

    tracing::debug!(
        segment = position,
        entries = placed.len(),
        duration_ms = segment.duration_ms,
        offset = timeline.offset,
        "appended segment"
    );

    timeline.entries.extend(placed.into_entries());

    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::time::Timestamp;

    fn segment(spans: &[(&str, u64, u64)], duration_ms: u64) -> SegmentRecognitionResult {
        let track = spans
            .iter()
            .map(|(text, start, end)| {
                SubtitleEntry::new(
                    *text,
                    Timestamp::from_millis(*start),
                    Timestamp::from_millis(*end),
                )
            })
            .collect();
        SegmentRecognitionResult::new(track, duration_ms)
    }

    fn empty(duration_ms: u64) -> SegmentRecognitionResult {
        SegmentRecognitionResult::new(SubtitleTrack::default(), duration_ms)
    }

    fn spans(track: &SubtitleTrack) -> Vec<(usize, u64, u64)> {
        track
            .iter()
            .map(|e| (e.index, e.start.as_millis(), e.end.as_millis()))
            .collect()
    }

    #[test]
    fn empty_input_is_error() {
        assert!(matches!(
            stitch(Vec::new()),
            Err(Error::Track(TrackError::Empty))
        ));
        assert!(matches!(
            stitch([empty(1_000), empty(2_000)]),
            Err(Error::Track(TrackError::Empty))
        ));
    }

    #[test]
    fn concatenates_without_rescale() {
        let track = stitch([
            segment(&[("hello", 0, 2_000)], 2_000),
            segment(&[("world", 0, 1_500)], 1_500),
        ])
        .unwrap();

        assert_eq!(spans(&track), vec![(1, 0, 2_000), (2, 2_000, 3_500)]);
        assert_eq!(track.entries()[1].text, "world");
    }

    #[test]
    fn rescales_drifted_segments() {
        let track = stitch([
            segment(&[("a", 0, 2_400), ("b", 2_400, 4_800)], 5_000),
            segment(&[("c", 100, 2_900)], 3_000),
        ])
        .unwrap();

        let entries = track.entries();
        assert_eq!(entries[1].end.as_millis(), 5_000);
        assert!(entries[2].start.as_millis() >= 5_000);
        assert_eq!(entries[2].end.as_millis(), 8_000);
    }

    #[test]
    fn empty_segment_keeps_offset() {
        let track = stitch([
            segment(&[("a", 0, 1_000)], 1_000),
            empty(4_000),
            segment(&[("b", 0, 500)], 500),
        ])
        .unwrap();

        assert_eq!(spans(&track), vec![(1, 0, 1_000), (2, 1_000, 1_500)]);
    }

    #[test]
    fn leading_empty_segments_are_skipped() {
        let track = stitch([empty(3_000), segment(&[("a", 200, 1_000)], 1_000)]).unwrap();

        assert_eq!(spans(&track), vec![(1, 200, 1_000)]);
    }

    #[test]
    fn entries_start_after_running_offset() {
        let track = stitch([
            segment(&[("a", 0, 900), ("b", 950, 1_000)], 1_200),
            segment(&[("c", 0, 400), ("d", 300, 800)], 800),
            segment(&[("e", 0, 100)], 100),
        ])
        .unwrap();

        let entries = track.entries();
        assert!(entries[2].start >= entries[1].end);
        assert!(entries[4].start >= entries[3].end);
        let indices: Vec<_> = entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }
}
