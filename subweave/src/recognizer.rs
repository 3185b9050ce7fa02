//! Sidecar-file recognizer.
//!
//! Reads each clip's recognition output from an SRT file stored next to the
//! audio, and measures the clip's real duration from its WAV header.

use hound::WavReader;
use std::path::{Path, PathBuf};
use subweave_core::traits::{BoxError, Recognizer};

/// Recognizer backed by pre-computed `.srt` files beside each clip.
#[derive(Clone, Debug, Default)]
pub struct SidecarRecognizer {
    /// Directory holding the SRT files (default: the clip's own directory)
    pub transcript_dir: Option<PathBuf>,
}

impl SidecarRecognizer {
    pub fn new(transcript_dir: Option<PathBuf>) -> Self {
        Self { transcript_dir }
    }

    /// Location of the recognition output for `clip`.
    pub fn transcript_path(&self, clip: &Path) -> PathBuf {
        let sidecar = clip.with_extension("srt");
        match (&self.transcript_dir, sidecar.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => sidecar,
        }
    }
}

impl Recognizer for SidecarRecognizer {
    fn transcribe(&self, clip: &Path, language: &str) -> Result<String, BoxError> {
        let path = self.transcript_path(clip);

        tracing::debug!(clip = ?clip.display(), transcript = ?path.display(), language, "reading sidecar transcript");

        std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read transcript {:?}: {e}", path.display()).into())
    }

    fn duration_ms(&self, clip: &Path) -> Result<u64, BoxError> {
        wav_duration_ms(clip)
    }
}

/// Duration of a WAV file in milliseconds, from its header.
pub fn wav_duration_ms(path: &Path) -> Result<u64, BoxError> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_rate == 0 {
        return Err(format!("invalid sample rate 0Hz: {:?}", path.display()).into());
    }

    // duration() counts samples per channel
    let frames = u64::from(reader.duration());
    Ok(frames * 1_000 / u64::from(spec.sample_rate))
}
