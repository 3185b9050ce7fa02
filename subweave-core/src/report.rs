//! Audit report for transcript-guided correction.

use serde::Serialize;
use std::fmt;

/// One entry whose text was changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextChange {
    /// Entry index in the corrected track
    pub index: usize,
    pub original: String,
    pub corrected: String,
}

/// Result of one batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    /// Service output was applied; only changed entries are listed
    Corrected { changes: Vec<TextChange> },
    /// Original text was kept
    Failed { reason: String },
}

/// Report record for one batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchRecord {
    /// 1-based batch number
    pub batch: usize,
    /// First entry index covered by the batch
    pub first_index: usize,
    /// Last entry index covered by the batch
    pub last_index: usize,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchRecord {
    pub fn changes(&self) -> &[TextChange] {
        match &self.outcome {
            BatchOutcome::Corrected { changes } => changes,
            BatchOutcome::Failed { .. } => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Failed { .. })
    }
}

/// Per-batch audit trail, in batch order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionReport {
    pub batches: Vec<BatchRecord>,
}

impl CorrectionReport {
    /// Total number of changed entries.
    pub fn changed_count(&self) -> usize {
        self.batches.iter().map(|b| b.changes().len()).sum()
    }

    /// Batches that kept their original text.
    pub fn failed_batches(&self) -> impl Iterator<Item = &BatchRecord> {
        self.batches.iter().filter(|b| b.is_failed())
    }

    /// All changes across batches, in track order.
    pub fn changes(&self) -> impl Iterator<Item = &TextChange> {
        self.batches.iter().flat_map(|b| b.changes())
    }
}

impl fmt::Display for CorrectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changed_count() == 0 && self.failed_batches().next().is_none() {
            return writeln!(f, "No changes made.");
        }

        for record in &self.batches {
            write!(
                f,
                "Batch {} (entries {}-{}): ",
                record.batch, record.first_index, record.last_index
            )?;

            match &record.outcome {
                BatchOutcome::Failed { reason } => writeln!(f, "failed, kept original ({reason})")?,
                BatchOutcome::Corrected { changes } if changes.is_empty() => {
                    writeln!(f, "no changes")?
                }
                BatchOutcome::Corrected { changes } => {
                    writeln!(f, "{} changed", changes.len())?;
                    for change in changes {
                        writeln!(
                            f,
                            "  #{}: {} -> {}",
                            change.index,
                            single_line(&change.original),
                            single_line(&change.corrected)
                        )?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Keep one line per change in the text report.
fn single_line(text: &str) -> String {
    text.replace('\n', " / ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CorrectionReport {
        CorrectionReport {
            batches: vec![
                BatchRecord {
                    batch: 1,
                    first_index: 1,
                    last_index: 2,
                    outcome: BatchOutcome::Corrected {
                        changes: vec![TextChange {
                            index: 2,
                            original: "helo\nworld".into(),
                            corrected: "hello\nworld".into(),
                        }],
                    },
                },
                BatchRecord {
                    batch: 2,
                    first_index: 3,
                    last_index: 3,
                    outcome: BatchOutcome::Failed {
                        reason: "expected 1 corrected lines, got 2".into(),
                    },
                },
                BatchRecord {
                    batch: 3,
                    first_index: 4,
                    last_index: 4,
                    outcome: BatchOutcome::Corrected { changes: vec![] },
                },
            ],
        }
    }

    #[test]
    fn renders_text_report() {
        let text = report().to_string();

        assert_eq!(
            text,
            "Batch 1 (entries 1-2): 1 changed\n  #2: helo / world -> hello / world\n\
             Batch 2 (entries 3-3): failed, kept original (expected 1 corrected lines, got 2)\n\
             Batch 3 (entries 4-4): no changes\n"
        );
    }

    #[test]
    fn renders_empty_report() {
        assert_eq!(CorrectionReport::default().to_string(), "No changes made.\n");
    }

    #[test]
    fn counts_changes_and_failures() {
        let report = report();

        assert_eq!(report.changed_count(), 1);
        assert_eq!(report.failed_batches().map(|b| b.batch).collect::<Vec<_>>(), vec![2]);
        assert_eq!(report.changes().next().map(|c| c.index), Some(2));
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(report()).unwrap();

        assert_eq!(json["batches"][0]["status"], "corrected");
        assert_eq!(json["batches"][0]["changes"][0]["corrected"], "hello\nworld");
        assert_eq!(json["batches"][1]["status"], "failed");
        assert_eq!(json["batches"][1]["first_index"], 3);
    }
}
