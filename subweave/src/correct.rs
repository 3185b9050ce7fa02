//! Correct subcommand - reconcile an SRT file against a reference transcript.

use crate::config::{CorrectionArgs, CorrectionSetup, ReportFormat};
use crate::stitch::format_secs;
use crate::store::{Artifact, SessionStore, Stage};
use color_eyre::Section;
use eyre::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use subweave_core::config::ParseMode;
use subweave_core::correct::{Correction, TranscriptCorrector};
use subweave_core::srt;
use subweave_core::track::SubtitleTrack;

/// CLI arguments for correction.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Subtitle file to correct (default: latest stitched subtitle in the store)
    pub path: Option<PathBuf>,

    /// Artifact directory searched when no subtitle file is given
    /// (default: local data directory)
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    #[command(flatten)]
    pub correction: CorrectionArgs,

    /// Output SRT path (default: input with `.corrected.srt` extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report path (default: input with `.report.txt` or `.report.json` extension)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report_format: ReportFormat,

    /// Fail on malformed subtitle blocks instead of skipping them
    #[arg(long)]
    pub strict: bool,
}

/// Resolved configuration for correction.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub setup: CorrectionSetup,
    pub output: PathBuf,
    pub report: PathBuf,
    pub report_format: ReportFormat,
    pub mode: ParseMode,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let path = match args.path {
            Some(path) => path,
            None => latest_stitched(args.workdir)?,
        };

        let output = args
            .output
            .unwrap_or_else(|| path.with_extension("corrected.srt"));
        let report = args.report.unwrap_or_else(|| {
            path.with_extension(format!("report.{}", args.report_format.extension()))
        });
        let mode = if args.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        };

        Ok(Self {
            path,
            setup: args.correction.try_into()?,
            output,
            report,
            report_format: args.report_format,
            mode,
        })
    }
}

/// Most recent stitched subtitle under `workdir`.
fn latest_stitched(workdir: Option<PathBuf>) -> Result<PathBuf> {
    let root = match workdir {
        Some(dir) => dir,
        None => SessionStore::default_root()?,
    };

    let latest = SessionStore::latest(&root, Stage::Stitch, Artifact::InitialSubtitle)?;

    tracing::info!(root = ?root.display(), path = ?latest.as_ref().map(|p| p.display()), "latest stitched subtitle");

    latest
        .ok_or_else(|| eyre::eyre!("no stitched subtitles found in {:?}", root.display()))
        .suggestion("pass a subtitle file, or run `weave run` first")
}

pub fn execute(config: Config) -> Result<()> {
    tracing::info!(
        input = ?config.path.display(),
        output = ?config.output.display(),
        "correcting subtitles"
    );

    let text = std::fs::read_to_string(&config.path)
        .wrap_err_with(|| format!("failed to read srt: {:?}", config.path.display()))?;
    let track = srt::from_text_with(&text, config.mode)
        .wrap_err_with(|| format!("failed to parse srt: {:?}", config.path.display()))?;

    let correction = correct_track(&track, &config.setup)?;

    tracing::info!(path = ?config.output.display(), "write srt file");
    std::fs::write(&config.output, srt::to_text(&correction.track))
        .wrap_err_with(|| format!("failed to write srt: {:?}", config.output.display()))?;

    tracing::info!(path = ?config.report.display(), "write report");
    std::fs::write(&config.report, config.report_format.render(&correction.report)?)
        .wrap_err_with(|| format!("failed to write report: {:?}", config.report.display()))?;

    Ok(())
}

/// Run transcript-guided correction with the configured service.
pub fn correct_track(track: &SubtitleTrack, setup: &CorrectionSetup) -> Result<Correction> {
    let s = Instant::now();

    let corrector = TranscriptCorrector::new(&setup.service, setup.config);
    let correction = corrector
        .correct(track, &setup.reference)
        .wrap_err("correction failed")
        .with_suggestion(|| {
            format!(
                "check that {:?} prints one JSON string per input line",
                setup.service.program.display()
            )
        })?;

    let d = s.elapsed();
    tracing::info!(
        duration = %format_secs(d.as_secs_f32()),
        changed = correction.report.changed_count(),
        failed_batches = correction.report.failed_batches().count(),
        "correction completed"
    );

    Ok(correction)
}
