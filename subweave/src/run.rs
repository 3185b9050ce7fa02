//! Run subcommand - stitch clips, then correct against the transcript.
//!
//! Artifacts are persisted through the session store:
//! the stitched track, the corrected track and the correction report.

use crate::config::{CorrectionArgs, CorrectionSetup, RecognitionArgs, RecognitionConfig, ReportFormat};
use crate::correct::correct_track;
use crate::stitch::stitch_clips;
use crate::store::{Artifact, SessionStore, Stage};
use color_eyre::Section;
use eyre::Result;
use std::path::PathBuf;
use subweave_core::srt;

/// CLI arguments for the full pipeline.
#[derive(clap::Args, Debug)]
pub struct Args {
    #[command(flatten)]
    pub recognition: RecognitionArgs,

    #[command(flatten)]
    pub correction: CorrectionArgs,

    /// Artifact directory (default: local data directory)
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Session identifier (default: current time, `YYYYMMDD_HHMMSS`)
    #[arg(long)]
    pub session: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report_format: ReportFormat,
}

/// Resolved configuration for the full pipeline.
#[derive(Debug)]
pub struct Config {
    pub recognition: RecognitionConfig,
    pub correction: CorrectionSetup,
    pub store: SessionStore,
    pub report_format: ReportFormat,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let root = match args.workdir {
            Some(dir) => dir,
            None => SessionStore::default_root()?,
        };

        let store = match args.session {
            Some(session) => SessionStore::open(root, session)?,
            None => SessionStore::create(root)?,
        };

        Ok(Self {
            recognition: args.recognition.try_into()?,
            correction: args.correction.try_into()?,
            store,
            report_format: args.report_format,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let store = &config.store;

    tracing::info!(
        session = store.session(),
        root = ?store.root().display(),
        "running pipeline"
    );

    let track = stitch_clips(&config.recognition)?;
    let initial = store.write(Stage::Stitch, Artifact::InitialSubtitle, &srt::to_text(&track))?;

    let correction = correct_track(&track, &config.correction)
        .with_note(|| format!("stitched subtitles saved to: {:?}", initial.display()))
        .with_suggestion(|| format!("weave correct {:?} --reference ...", initial.display()))?;

    let corrected = store.write(
        Stage::Correct,
        Artifact::CorrectedSubtitle,
        &srt::to_text(&correction.track),
    )?;

    let report_artifact = match config.report_format {
        ReportFormat::Text => Artifact::TextReport,
        ReportFormat::Json => Artifact::JsonReport,
    };
    let report = store.write(
        Stage::Correct,
        report_artifact,
        &config.report_format.render(&correction.report)?,
    )?;

    println!("{}", initial.display());
    println!("{}", corrected.display());
    println!("{}", report.display());

    Ok(())
}
