//! Ordered subtitle track and its timeline operations.

use crate::config::ParseMode;
use crate::error::{TimeError, TrackError};
use crate::time::Timestamp;
use crate::types::{SubtitleEntry, normalize_text};

const ARROW: &str = "-->";

/// Ordered sequence of subtitle entries.
///
/// Entries are kept sorted by ascending start time and numbered `1..=len`.
/// Every constructor re-derives the order and the indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubtitleTrack {
    entries: Vec<SubtitleEntry>,
}

impl SubtitleTrack {
    /// Build a track from entries in any order.
    ///
    /// Entries with equal start times keep their relative order. An `end`
    /// before `start` is clamped, and blank text lines are dropped.
    pub fn new(mut entries: Vec<SubtitleEntry>) -> Self {
        entries.sort_by_key(|e| e.start);
        for (entry, index) in entries.iter_mut().zip(1..) {
            entry.index = index;
            entry.end = entry.end.max(entry.start);
            entry.text = normalize_text(&entry.text);
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<SubtitleEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&SubtitleEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubtitleEntry> {
        self.entries.iter()
    }

    /// Parse subtitle text, skipping malformed blocks.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Empty`] if no block parses.
    pub fn parse(text: &str) -> Result<Self, TrackError> {
        Self::parse_with(text, ParseMode::Lenient)
    }

    /// Parse subtitle text with an explicit leniency policy.
    ///
    /// In [`ParseMode::Strict`] the first malformed block fails the whole parse.
    pub fn parse_with(text: &str, mode: ParseMode) -> Result<Self, TrackError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut entries = Vec::new();

        for (lines, block) in split_blocks(text).into_iter().zip(1..) {
            match parse_block(&lines) {
                Ok(entry) => entries.push(entry),
                Err(reason) if mode == ParseMode::Strict => {
                    return Err(TrackError::MalformedBlock { block, reason });
                }
                Err(reason) => {
                    tracing::warn!(block, %reason, "skipping malformed subtitle block");
                }
            }
        }

        if entries.is_empty() {
            return Err(TrackError::Empty);
        }

        Ok(Self::new(entries))
    }

    /// Render as SRT text, numbering entries by position.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (entry, index) in self.entries.iter().zip(1..) {
            out.push_str(&format!(
                "{index}\n{} {ARROW} {}\n{}\n\n",
                entry.start, entry.end, entry.text
            ));
        }
        out
    }

    /// Return a copy with `offset_ms` added to every timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Invalid`] if any shifted timestamp would be negative.
    pub fn shift(&self, offset_ms: i64) -> Result<Self, TimeError> {
        let entries = self
            .entries
            .iter()
            .map(|e| {
                Ok(SubtitleEntry {
                    start: e.start.offset_by(offset_ms)?,
                    end: e.end.offset_by(offset_ms)?,
                    ..e.clone()
                })
            })
            .collect::<Result<_, TimeError>>()?;

        Ok(Self { entries })
    }

    /// Return a copy linearly rescaled so the last entry ends at `target_ms`.
    ///
    /// Identity when the track is empty, already ends at `target_ms`, or its last
    /// entry ends at zero (no time axis to scale).
    pub fn rescale(&self, target_ms: u64) -> Self {
        let current = match self.last() {
            Some(last) => last.end.as_millis(),
            None => return self.clone(),
        };

        if current == target_ms || current == 0 {
            return self.clone();
        }

        tracing::debug!(from = current, to = target_ms, "rescaling track");

        let entries = self
            .entries
            .iter()
            .map(|e| SubtitleEntry {
                start: e.start.scale(target_ms, current),
                end: e.end.scale(target_ms, current),
                ..e.clone()
            })
            .collect();

        Self { entries }
    }

    /// Return a copy with each entry's text replaced, keeping timestamps.
    ///
    /// `texts` must yield exactly one item per entry; extra items are ignored and
    /// missing items leave the remaining entries unchanged. Blank lines in the new
    /// texts are dropped.
    pub fn with_texts<I>(&self, texts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut entries = self.entries.clone();
        for (entry, text) in entries.iter_mut().zip(texts) {
            entry.text = normalize_text(&text);
        }
        Self { entries }
    }
}

impl FromIterator<SubtitleEntry> for SubtitleTrack {
    fn from_iter<I: IntoIterator<Item = SubtitleEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SubtitleTrack {
    type Item = &'a SubtitleEntry;
    type IntoIter = std::slice::Iter<'a, SubtitleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Split text into blocks of non-blank lines.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Parse one block: optional index line, timing line, text lines.
fn parse_block(lines: &[&str]) -> Result<SubtitleEntry, String> {
    let timing_pos = lines
        .iter()
        .take(2)
        .position(|line| line.contains(ARROW))
        .ok_or_else(|| format!("missing `{ARROW}` separator"))?;

    let (start, end) = parse_timing(lines[timing_pos])?;
    if end < start {
        return Err(format!("end {end} precedes start {start}"));
    }

    let text = lines[timing_pos + 1..].join("\n");

    Ok(SubtitleEntry::new(text, start, end))
}

/// Parse `start --> end`, ignoring trailing cue settings after the end time.
fn parse_timing(line: &str) -> Result<(Timestamp, Timestamp), String> {
    let (start, end) = line
        .split_once(ARROW)
        .ok_or_else(|| format!("missing `{ARROW}` separator"))?;

    let end = end.split_whitespace().next().unwrap_or_default();
    let start = start.trim().parse::<Timestamp>().map_err(|e| e.to_string())?;
    let end = end.parse::<Timestamp>().map_err(|e| e.to_string())?;

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, start: u64, end: u64) -> SubtitleEntry {
        SubtitleEntry::new(text, Timestamp::from_millis(start), Timestamp::from_millis(end))
    }

    fn spans(track: &SubtitleTrack) -> Vec<(u64, u64)> {
        track
            .iter()
            .map(|e| (e.start.as_millis(), e.end.as_millis()))
            .collect()
    }

    #[test]
    fn parses_standard_blocks() {
        let text = "1\n00:00:00,000 --> 00:00:01,000\nHello\nworld\n\n2\n00:00:01,500 --> 00:00:02,000\nAgain\n";

        let track = SubtitleTrack::parse(text).unwrap();

        assert_eq!(track.len(), 2);
        assert_eq!(track.entries()[0].text, "Hello\nworld");
        assert_eq!(track.entries()[1].index, 2);
        assert_eq!(spans(&track), vec![(0, 1_000), (1_500, 2_000)]);
    }

    #[test]
    fn parses_crlf_and_bom() {
        let text = "\u{feff}1\r\n00:00:00,000 --> 00:00:01,000\r\nHi\r\n\r\n";

        let track = SubtitleTrack::parse(text).unwrap();

        assert_eq!(track.len(), 1);
        assert_eq!(track.entries()[0].text, "Hi");
    }

    #[test]
    fn ignores_source_indices() {
        let text = "7\n00:00:00,000 --> 00:00:01,000\nA\n\n3\n00:00:02,000 --> 00:00:03,000\nB\n";

        let track = SubtitleTrack::parse(text).unwrap();

        let indices: Vec<_> = track.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn skips_malformed_blocks() {
        let text = "1\n00:00:00,000 00:00:01,000\nno arrow\n\n\
                    2\n00:00:01,000 --> 00:00:02,000\nkept\n\n\
                    3\n00:00:xx,000 --> 00:00:03,000\nbad time\n\n\
                    4\n00:00:05,000 --> 00:00:04,000\nreversed\n";

        let track = SubtitleTrack::parse(text).unwrap();

        match track.entries() {
            [single] => {
                assert_eq!(single.text, "kept");
                assert_eq!(single.index, 1);
            }
            other => panic!("expected 1 entry, got {other:?}"),
        }
    }

    #[test]
    fn strict_mode_reports_block() {
        let text = "1\n00:00:00,000 --> 00:00:01,000\nok\n\n2\nbroken\ntext\n";

        let err = SubtitleTrack::parse_with(text, ParseMode::Strict).unwrap_err();

        assert!(matches!(err, TrackError::MalformedBlock { block: 2, .. }));
    }

    #[test]
    fn empty_input_is_error() {
        assert!(matches!(SubtitleTrack::parse(""), Err(TrackError::Empty)));
        assert!(matches!(
            SubtitleTrack::parse("1\nnot a subtitle\n"),
            Err(TrackError::Empty)
        ));
    }

    #[test]
    fn accepts_missing_index_and_cue_settings() {
        let text = "00:00:01,000 --> 00:00:02,000 align:start\nno index\n";

        let track = SubtitleTrack::parse(text).unwrap();

        assert_eq!(spans(&track), vec![(1_000, 2_000)]);
        assert_eq!(track.entries()[0].text, "no index");
    }

    #[test]
    fn new_sorts_by_start_and_reindexes() {
        let track = SubtitleTrack::new(vec![entry("b", 2_000, 3_000), entry("a", 0, 1_000)]);

        let texts: Vec<_> = track.iter().map(|e| (e.index, e.text.as_str())).collect();
        assert_eq!(texts, vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn renders_contiguous_indices() {
        let mut entries = vec![entry("a", 0, 1_000), entry("b", 1_000, 2_500)];
        entries[0].index = 42;
        let track = SubtitleTrack { entries };

        assert_eq!(
            track.render(),
            "1\n00:00:00,000 --> 00:00:01,000\na\n\n2\n00:00:01,000 --> 00:00:02,500\nb\n\n"
        );
    }

    #[test]
    fn shift_offsets_every_timestamp() {
        let track = SubtitleTrack::new(vec![entry("a", 0, 1_000), entry("b", 1_000, 2_000)]);

        let shifted = track.shift(500).unwrap();

        assert_eq!(spans(&shifted), vec![(500, 1_500), (1_500, 2_500)]);
        assert_eq!(spans(&track), vec![(0, 1_000), (1_000, 2_000)]);
    }

    #[test]
    fn shift_rejects_negative_result() {
        let track = SubtitleTrack::new(vec![entry("a", 100, 1_000)]);

        assert!(track.shift(-100).is_ok());
        assert!(matches!(track.shift(-101), Err(TimeError::Invalid { .. })));
    }

    #[test]
    fn rescale_hits_target_exactly() {
        let track = SubtitleTrack::new(vec![entry("a", 0, 2_400), entry("b", 2_400, 4_800)]);

        let scaled = track.rescale(5_000);

        assert_eq!(spans(&scaled), vec![(0, 2_500), (2_500, 5_000)]);
    }

    #[test]
    fn rescale_is_identity_when_aligned_or_empty() {
        let track = SubtitleTrack::new(vec![entry("a", 100, 2_000)]);

        assert_eq!(track.rescale(2_000), track);
        assert_eq!(SubtitleTrack::default().rescale(1_000), SubtitleTrack::default());
        assert_eq!(
            SubtitleTrack::new(vec![entry("z", 0, 0)]).rescale(1_000),
            SubtitleTrack::new(vec![entry("z", 0, 0)])
        );
    }

    #[test]
    fn new_clamps_reversed_entries() {
        let reversed = SubtitleEntry {
            index: 0,
            start: Timestamp::from_millis(5_000),
            end: Timestamp::from_millis(1_000),
            text: "late".into(),
        };

        let track = SubtitleTrack::new(vec![reversed]);

        assert_eq!(spans(&track), vec![(5_000, 5_000)]);
        let reparsed = SubtitleTrack::parse(&track.render()).unwrap();
        assert_eq!(spans(&reparsed), spans(&track));
    }

    #[test]
    fn blank_lines_in_text_survive_round_trip() {
        let literal = SubtitleEntry {
            index: 0,
            start: Timestamp::from_millis(1_000),
            end: Timestamp::from_millis(2_000),
            text: "c\n  \nd".into(),
        };
        let track = SubtitleTrack::new(vec![entry("a\n\nb", 0, 1_000), literal]);
        let corrected = track.with_texts(["first\n\n\nsecond".to_string(), "x\r\n\r\ny".to_string()]);

        for track in [&track, &corrected] {
            let reparsed = SubtitleTrack::parse(&track.render()).unwrap();
            assert_eq!(reparsed, *track);
        }

        let texts: Vec<_> = track.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["a\nb", "c\nd"]);
        let texts: Vec<_> = corrected.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first\nsecond", "x\ny"]);
    }

    #[test]
    fn with_texts_keeps_timestamps() {
        let track = SubtitleTrack::new(vec![entry("helo", 0, 1_000), entry("wrld", 1_000, 2_000)]);

        let corrected = track.with_texts(["hello".to_string(), "world".to_string()]);

        assert_eq!(spans(&corrected), spans(&track));
        assert_eq!(corrected.entries()[1].text, "world");
    }
}
