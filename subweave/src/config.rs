//! Configuration types for resolved CLI arguments.
//!
//! This module contains the shared Args structs and the Config structs they
//! resolve into through TryFrom.

use crate::recognizer::SidecarRecognizer;
use crate::service::CommandService;
use eyre::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use subweave_core::config::{CorrectionConfig, ParseMode};
use subweave_core::report::CorrectionReport;

/// Audio clip extension picked up when a directory is given
const CLIP_EXTENSION: &str = "wav";

/// Default per-call deadline for the correction program
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 300;

/// CLI arguments for the recognition stage.
#[derive(clap::Args, Debug)]
pub struct RecognitionArgs {
    /// Audio clips in playback order, or directories of WAV clips (sorted by name)
    #[arg(required = true)]
    pub clips: Vec<PathBuf>,

    /// Language hint passed to the recognizer
    #[arg(short, long, default_value = "zh")]
    pub language: String,

    /// Directory holding per-clip SRT files (default: beside each clip)
    #[arg(long)]
    pub transcripts: Option<PathBuf>,

    /// Fail on malformed subtitle blocks instead of skipping them
    #[arg(long)]
    pub strict: bool,
}

/// Resolved recognition configuration.
#[derive(Debug)]
pub struct RecognitionConfig {
    pub clips: Vec<PathBuf>,
    pub language: String,
    pub recognizer: SidecarRecognizer,
    pub mode: ParseMode,
}

impl TryFrom<RecognitionArgs> for RecognitionConfig {
    type Error = eyre::Error;

    fn try_from(args: RecognitionArgs) -> Result<Self> {
        let mut clips = Vec::new();
        for path in args.clips {
            if path.is_dir() {
                clips.extend(list_clips(&path)?);
            } else {
                clips.push(path);
            }
        }

        if clips.is_empty() {
            eyre::bail!("no {CLIP_EXTENSION} clips found");
        }

        let mode = if args.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        };

        Ok(Self {
            clips,
            language: args.language,
            recognizer: SidecarRecognizer::new(args.transcripts),
            mode,
        })
    }
}

/// WAV files in `dir`, sorted by file name.
fn list_clips(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut clips = Vec::new();

    for entry in std::fs::read_dir(dir)
        .wrap_err_with(|| format!("failed to list clips: {:?}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == CLIP_EXTENSION) {
            clips.push(path);
        }
    }

    clips.sort();
    Ok(clips)
}

/// CLI arguments for the correction stage.
#[derive(clap::Args, Debug)]
pub struct CorrectionArgs {
    /// Reference transcript (plain text)
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Correction program; receives `{"lines": [...], "reference": "..."}` on stdin
    #[arg(long)]
    pub command: PathBuf,

    /// Argument passed to the correction program (repeatable)
    #[arg(long = "command-arg", allow_hyphen_values = true)]
    pub command_args: Vec<String>,

    /// Seconds before a correction call is killed and its batch kept as is (0 = no limit)
    #[arg(long, default_value_t = DEFAULT_COMMAND_TIMEOUT_SECS)]
    pub command_timeout: u64,

    #[command(flatten)]
    pub correction_config: CorrectionConfig,
}

/// Resolved correction configuration.
#[derive(Debug)]
pub struct CorrectionSetup {
    pub reference: String,
    pub service: CommandService,
    pub config: CorrectionConfig,
}

impl TryFrom<CorrectionArgs> for CorrectionSetup {
    type Error = eyre::Error;

    fn try_from(args: CorrectionArgs) -> Result<Self> {
        args.correction_config.validate()?;

        let reference = std::fs::read_to_string(&args.reference).wrap_err_with(|| {
            format!("failed to read reference transcript: {:?}", args.reference.display())
        })?;

        if reference.trim().is_empty() {
            eyre::bail!("reference transcript is empty: {:?}", args.reference.display());
        }

        let mut service = CommandService::new(args.command, args.command_args);
        if args.command_timeout > 0 {
            service = service.with_timeout(Duration::from_secs(args.command_timeout));
        }

        Ok(Self {
            reference,
            service,
            config: args.correction_config,
        })
    }
}

/// Correction report output format.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable, one line per changed entry
    #[default]
    Text,
    /// Structured JSON
    Json,
}

impl ReportFormat {
    pub fn render(self, report: &CorrectionReport) -> Result<String> {
        match self {
            ReportFormat::Text => Ok(report.to_string()),
            ReportFormat::Json => {
                serde_json::to_string_pretty(report).wrap_err("failed to serialize report")
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}
