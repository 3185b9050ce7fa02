//! Stitch subcommand - merge per-clip subtitles into one SRT timeline.

use crate::config::{RecognitionArgs, RecognitionConfig};
use color_eyre::Section;
use eyre::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use subweave_core::error::{Error, TrackError};
use subweave_core::recognize::recognize_segments;
use subweave_core::srt;
use subweave_core::stitch::stitch;
use subweave_core::track::SubtitleTrack;

/// CLI arguments for stitching.
#[derive(clap::Args, Debug)]
pub struct Args {
    #[command(flatten)]
    pub recognition: RecognitionArgs,

    /// Output SRT path (default: first clip's directory, `stitched.srt`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the first and last entries to stdout
    #[arg(long)]
    pub preview: bool,
}

/// Resolved configuration for stitching.
#[derive(Debug)]
pub struct Config {
    pub recognition: RecognitionConfig,
    pub output: PathBuf,
    pub preview: bool,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let recognition = RecognitionConfig::try_from(args.recognition)?;

        let output = args.output.unwrap_or_else(|| {
            recognition
                .clips
                .first()
                .and_then(|clip| clip.parent())
                .map(|dir| dir.join("stitched.srt"))
                .unwrap_or_else(|| PathBuf::from("stitched.srt"))
        });

        Ok(Self {
            recognition,
            output,
            preview: args.preview,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    tracing::info!(
        clips = config.recognition.clips.len(),
        output = ?config.output.display(),
        "stitching subtitles"
    );

    let track = stitch_clips(&config.recognition)?;

    tracing::info!(path = ?config.output.display(), "write srt file");

    std::fs::write(&config.output, srt::to_text(&track))
        .wrap_err_with(|| format!("failed to write srt: {:?}", config.output.display()))?;

    if config.preview {
        print!("{}", srt::preview(&track, 3, 3));
    }

    Ok(())
}

/// Recognize every clip and stitch the results into one track.
pub fn stitch_clips(config: &RecognitionConfig) -> Result<SubtitleTrack> {
    let s = Instant::now();

    let segments = recognize_segments(
        &config.recognizer,
        &config.clips,
        &config.language,
        config.mode,
    )
    .wrap_err("recognition failed")
    .suggestion("each clip needs a matching .srt file, see --transcripts")?;

    let track = stitch(segments).map_err(stitch_error)?;

    let d = s.elapsed();
    tracing::info!(duration = %format_secs(d.as_secs_f32()), entries = track.len(), "stitching completed");

    Ok(track)
}

/// Wrap a stitching error, noting empty transcripts when nothing was stitched.
fn stitch_error(e: Error) -> eyre::Report {
    let empty = matches!(e, Error::Track(TrackError::Empty));
    let report = eyre::Report::new(e).wrap_err("stitching failed");

    if empty {
        report.note("every clip produced an empty transcript")
    } else {
        report
    }
}

/// Format seconds as a string with two decimal places.
pub(crate) fn format_secs(secs: f32) -> String {
    format!("{:.2}s", secs)
}
