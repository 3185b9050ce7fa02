//! Transcript-guided subtitle correction.
//!
//! The track is cut into fixed-size batches, each paired with a slice of the
//! reference transcript and sent to a [`CorrectionService`]. A batch whose call
//! fails or returns the wrong number of lines keeps its original text; the whole
//! call only fails when every batch does.

use crate::align::ReferenceAligner;
use crate::config::CorrectionConfig;
use crate::error::{ConfigError, CorrectionError, Result, TrackError};
use crate::report::{BatchOutcome, BatchRecord, CorrectionReport, TextChange};
use crate::track::SubtitleTrack;
use crate::traits::CorrectionService;
use crate::types::{SubtitleEntry, normalize_text};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

type BatchResult = std::result::Result<Vec<String>, CorrectionError>;

/// Corrected track with its audit report.
#[derive(Clone, Debug)]
pub struct Correction {
    pub track: SubtitleTrack,
    pub report: CorrectionReport,
}

/// One batch of entries and its reference slice.
#[derive(Debug)]
struct Batch<'a> {
    /// 1-based batch number
    number: usize,
    entries: &'a [SubtitleEntry],
    reference: &'a str,
}

impl Batch<'_> {
    fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }

    fn index_range(&self) -> (usize, usize) {
        let first = self.entries.first().map_or(0, |e| e.index);
        let last = self.entries.last().map_or(0, |e| e.index);
        (first, last)
    }
}

/// Batched corrector driving an injected correction service.
pub struct TranscriptCorrector<S> {
    service: S,
    aligner: Box<dyn ReferenceAligner>,
    config: CorrectionConfig,
}

impl<S: CorrectionService> TranscriptCorrector<S> {
    /// Create a corrector using the aligner selected by `config.align`.
    pub fn new(service: S, config: CorrectionConfig) -> Self {
        Self {
            service,
            aligner: config.align.aligner(),
            config,
        }
    }

    /// Replace the reference aligner.
    pub fn with_aligner(self, aligner: impl ReferenceAligner + 'static) -> Self {
        Self {
            aligner: Box::new(aligner),
            ..self
        }
    }

    /// Correct `track` against `reference`.
    ///
    /// Timestamps are never changed; only entry text is replaced.
    ///
    /// # Errors
    ///
    /// - [`TrackError::Empty`] if the track has no entries
    /// - [`ConfigError`] for an invalid worker count or a misbehaving aligner
    /// - [`CorrectionError::Failed`] if every batch failed
    pub fn correct(&self, track: &SubtitleTrack, reference: &str) -> Result<Correction> {
        self.config.validate()?;

        if track.is_empty() {
            return Err(TrackError::Empty.into());
        }

        let chunks: Vec<&[SubtitleEntry]> =
            track.entries().chunks(self.config.batch_size.get()).collect();

        let slices = self.aligner.split(reference, chunks.len());
        if slices.len() != chunks.len() {
            return Err(ConfigError::AlignerMismatch {
                expected: chunks.len(),
                got: slices.len(),
            }
            .into());
        }

        let batches: Vec<Batch> = chunks
            .into_iter()
            .zip(slices)
            .zip(1..)
            .map(|((entries, reference), number)| Batch {
                number,
                entries,
                reference,
            })
            .collect();

        tracing::info!(
            entries = track.len(),
            batches = batches.len(),
            batch_size = self.config.batch_size.get(),
            workers = self.config.workers,
            "correcting subtitles"
        );

        let results = if self.config.workers > 1 && batches.len() > 1 {
            self.run_pooled(&batches)
        } else {
            batches.iter().map(|b| self.run_batch(b)).collect()
        };

        let correction = assemble(track, &batches, results);

        let failed = correction.report.failed_batches().count();
        if failed == batches.len() {
            return Err(CorrectionError::Failed { batches: failed }.into());
        }

        tracing::info!(
            changed = correction.report.changed_count(),
            failed,
            "correction completed"
        );

        Ok(correction)
    }

    /// Send one batch to the service and check the response shape.
    fn run_batch(&self, batch: &Batch) -> BatchResult {
        let lines = batch.lines();

        tracing::debug!(batch = batch.number, lines = lines.len(), "correcting batch");

        let corrected = self
            .service
            .correct(&lines, batch.reference)
            .map_err(|e| CorrectionError::Service {
                batch: batch.number,
                message: e.to_string(),
            })?;

        if corrected.len() != lines.len() {
            return Err(CorrectionError::Mismatch {
                batch: batch.number,
                expected: lines.len(),
                got: corrected.len(),
            });
        }

        Ok(corrected)
    }

    /// Run batches on at most `workers` scoped threads, returning results in batch order.
    fn run_pooled(&self, batches: &[Batch]) -> Vec<BatchResult> {
        let workers = self.config.workers.min(batches.len());
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                scope.spawn(move || {
                    while let Some(batch) = batches.get(next.fetch_add(1, Ordering::Relaxed)) {
                        if tx.send((batch.number, self.run_batch(batch))).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tx);

        let mut slots: Vec<Option<BatchResult>> = batches.iter().map(|_| None).collect();
        for (number, result) in rx {
            slots[number - 1] = Some(result);
        }

        slots
            .into_iter()
            .zip(1..)
            .map(|(slot, batch)| {
                slot.unwrap_or_else(|| {
                    Err(CorrectionError::Service {
                        batch,
                        message: "worker exited without a result".to_string(),
                    })
                })
            })
            .collect()
    }
}

/// Merge batch results into the corrected track and report.
fn assemble(track: &SubtitleTrack, batches: &[Batch], results: Vec<BatchResult>) -> Correction {
    let mut texts = Vec::with_capacity(track.len());
    let mut records = Vec::with_capacity(batches.len());

    for (batch, result) in batches.iter().zip(results) {
        let (first_index, last_index) = batch.index_range();

        let outcome = match result {
            Ok(corrected) => {
                let corrected: Vec<String> = corrected.iter().map(|t| normalize_text(t)).collect();
                let changes = batch
                    .entries
                    .iter()
                    .zip(&corrected)
                    .filter(|(entry, text)| entry.text != **text)
                    .map(|(entry, text)| TextChange {
                        index: entry.index,
                        original: entry.text.clone(),
                        corrected: text.clone(),
                    })
                    .collect();
                texts.extend(corrected);
                BatchOutcome::Corrected { changes }
            }
            Err(e) => {
                tracing::warn!(batch = batch.number, error = %e, "keeping original batch text");
                texts.extend(batch.lines());
                BatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        records.push(BatchRecord {
            batch: batch.number,
            first_index,
            last_index,
            outcome,
        });
    }

    Correction {
        track: track.with_texts(texts),
        report: CorrectionReport { batches: records },
    }
}
