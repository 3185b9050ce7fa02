//! End-to-end tests: raw recognizer output through stitching, correction and SRT.

use subweave_core::config::{BatchSize, CorrectionConfig};
use subweave_core::correct::TranscriptCorrector;
use subweave_core::srt;
use subweave_core::stitch::stitch;
use subweave_core::traits::{BoxError, CorrectionService};
use subweave_core::types::SegmentRecognitionResult;

/// Replaces known misspellings, line by line.
struct Dictionary(&'static [(&'static str, &'static str)]);

impl CorrectionService for Dictionary {
    fn correct(&self, lines: &[String], _reference: &str) -> Result<Vec<String>, BoxError> {
        Ok(lines
            .iter()
            .map(|line| {
                self.0
                    .iter()
                    .fold(line.clone(), |acc, (from, to)| acc.replace(from, to))
            })
            .collect())
    }
}

fn segment(raw: &str, duration_ms: u64) -> SegmentRecognitionResult {
    SegmentRecognitionResult::new(srt::from_text(raw).unwrap(), duration_ms)
}

#[test]
fn stitches_two_segments() {
    let track = stitch([
        segment("1\n00:00:00,000 --> 00:00:02,000\nhello\n", 2_000),
        segment("1\n00:00:00,000 --> 00:00:01,500\nworld\n", 1_500),
    ])
    .unwrap();

    assert_eq!(
        srt::to_text(&track),
        "1\n00:00:00,000 --> 00:00:02,000\nhello\n\n2\n00:00:02,000 --> 00:00:03,500\nworld\n\n"
    );
}

#[test]
fn rescales_segments_to_real_durations() {
    let track = stitch([
        segment("1\n00:00:00,000 --> 00:00:04,800\nfirst\n", 5_000),
        segment(
            "1\n00:00:00,000 --> 00:00:01,000\nsecond\n\n2\n00:00:01,000 --> 00:00:02,900\nthird\n",
            3_000,
        ),
    ])
    .unwrap();

    let entries = track.entries();
    assert_eq!(entries[0].end.as_millis(), 5_000);
    assert!(entries[1].start.as_millis() >= 5_000);
    assert_eq!(entries[2].end.as_millis(), 8_000);
}

#[test]
fn stitch_correct_and_render() {
    let track = stitch([
        segment(
            "1\n00:00:00,000 --> 00:00:01,000\nhelo world\n\n2\n00:00:01,000 --> 00:00:02,000\ngood mornin\n",
            2_000,
        ),
        segment("1\n00:00:00,000 --> 00:00:01,000\nthanks\n", 1_000),
    ])
    .unwrap();

    let corrector = TranscriptCorrector::new(
        Dictionary(&[("helo", "hello"), ("mornin", "morning")]),
        CorrectionConfig::new(BatchSize::try_from(5).unwrap()),
    );

    let correction = corrector
        .correct(&track, "hello world. good morning. thanks.")
        .unwrap();

    let rendered = srt::to_text(&correction.track);
    assert_eq!(
        rendered,
        "1\n00:00:00,000 --> 00:00:01,000\nhello world\n\n\
         2\n00:00:01,000 --> 00:00:02,000\ngood morning\n\n\
         3\n00:00:02,000 --> 00:00:03,000\nthanks\n\n"
    );

    assert_eq!(
        correction.report.to_string(),
        "Batch 1 (entries 1-3): 2 changed\n  #1: helo world -> hello world\n  #2: good mornin -> good morning\n"
    );

    let reparsed = srt::from_text(&rendered).unwrap();
    assert_eq!(reparsed, correction.track);
}
