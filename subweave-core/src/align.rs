//! Reference transcript alignment policies.
//!
//! Batch `i` of subtitle entries is paired with slice `i` of the reference text.
//! How the reference is cut is pluggable.

use crate::config::AlignPolicy;

/// Sentence terminators the sentence aligner snaps to.
const SENTENCE_ENDS: [char; 7] = ['.', '!', '?', '。', '！', '？', '\n'];

/// Splits a reference transcript into contiguous per-batch slices.
pub trait ReferenceAligner: Send + Sync {
    /// Split `reference` into exactly `parts` contiguous slices covering it.
    fn split<'a>(&self, reference: &'a str, parts: usize) -> Vec<&'a str>;
}

/// Cut at proportional character offsets.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProportionalAligner;

/// Cut at the sentence boundary nearest each proportional offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct SentenceAligner;

impl ReferenceAligner for ProportionalAligner {
    fn split<'a>(&self, reference: &'a str, parts: usize) -> Vec<&'a str> {
        let bounds = char_bounds(reference);
        let cuts = (1..parts)
            .map(|i| proportional_cut(&bounds, i, parts))
            .collect::<Vec<_>>();
        slice_at(reference, &cuts, parts)
    }
}

impl ReferenceAligner for SentenceAligner {
    fn split<'a>(&self, reference: &'a str, parts: usize) -> Vec<&'a str> {
        let bounds = char_bounds(reference);
        let sentence_cuts: Vec<usize> = reference
            .char_indices()
            .filter(|(_, c)| SENTENCE_ENDS.contains(c))
            .map(|(i, c)| i + c.len_utf8())
            .collect();

        let mut cuts = Vec::with_capacity(parts.saturating_sub(1));
        let mut floor = 0;

        for i in 1..parts {
            let target = proportional_cut(&bounds, i, parts);
            let cut = nearest(&sentence_cuts, target)
                .unwrap_or(target)
                .max(floor);
            cuts.push(cut);
            floor = cut;
        }

        slice_at(reference, &cuts, parts)
    }
}

impl AlignPolicy {
    /// Aligner implementing this policy.
    pub fn aligner(self) -> Box<dyn ReferenceAligner> {
        match self {
            AlignPolicy::Proportional => Box::new(ProportionalAligner),
            AlignPolicy::Sentence => Box::new(SentenceAligner),
        }
    }
}

/// Byte offsets of every char boundary, including the end.
fn char_bounds(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Byte offset at character fraction `i / parts`.
fn proportional_cut(bounds: &[usize], i: usize, parts: usize) -> usize {
    let chars = bounds.len() - 1;
    bounds[chars * i / parts]
}

/// Element of sorted `cuts` closest to `target`, preferring the earlier on ties.
fn nearest(cuts: &[usize], target: usize) -> Option<usize> {
    cuts.iter().copied().min_by_key(|&c| c.abs_diff(target))
}

/// Slice `text` at non-decreasing byte offsets into `parts` pieces.
fn slice_at<'a>(text: &'a str, cuts: &[usize], parts: usize) -> Vec<&'a str> {
    if parts == 0 {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(parts);
    let mut start = 0;

    for &cut in cuts {
        slices.push(text[start..cut].trim());
        start = cut;
    }
    slices.push(text[start..].trim());

    slices
}
