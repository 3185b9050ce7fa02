//! Session-keyed artifact store.
//!
//! Files live flat under one root directory and are named
//! `<session>_<stage>_<artifact>`, so that sorting by name orders by session.

use eyre::{Context, OptionExt, Result};
use std::path::{Path, PathBuf};

/// Application directory name under the platform data directory
const APP_DIR: &str = "subweave";

/// Session identifier format, e.g. `20250512_152332`
const SESSION_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Pipeline stage producing an artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Stitch,
    Correct,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Stitch => "stitch",
            Stage::Correct => "correct",
        }
    }
}

/// Artifact kinds persisted by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Artifact {
    InitialSubtitle,
    CorrectedSubtitle,
    TextReport,
    JsonReport,
}

impl Artifact {
    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::InitialSubtitle => "initial_subtitle.srt",
            Artifact::CorrectedSubtitle => "corrected_subtitle.srt",
            Artifact::TextReport => "correction_report.txt",
            Artifact::JsonReport => "correction_report.json",
        }
    }
}

/// Artifact store for one session.
#[derive(Clone, Debug)]
pub struct SessionStore {
    root: PathBuf,
    session: String,
}

impl SessionStore {
    /// Default root: `<platform data dir>/subweave`.
    pub fn default_root() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_eyre("failed to locate local data directory")
    }

    /// Start a new session identified by the current local time.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let session = chrono::Local::now().format(SESSION_FORMAT).to_string();
        Self::open(root, session)
    }

    /// Open an existing or explicitly named session.
    pub fn open(root: impl Into<PathBuf>, session: impl Into<String>) -> Result<Self> {
        let root = root.into();
        let session = session.into();

        if session.is_empty() || session.contains(['/', '\\']) {
            eyre::bail!("invalid session identifier: {session:?}");
        }

        std::fs::create_dir_all(&root)
            .wrap_err_with(|| format!("failed to create store: {:?}", root.display()))?;

        Ok(Self { root, session })
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of an artifact for this session.
    pub fn path(&self, stage: Stage, artifact: Artifact) -> PathBuf {
        self.root.join(format!(
            "{}_{}_{}",
            self.session,
            stage.as_str(),
            artifact.file_name()
        ))
    }

    /// Write an artifact, returning its location.
    pub fn write(&self, stage: Stage, artifact: Artifact, contents: &str) -> Result<PathBuf> {
        let path = self.path(stage, artifact);

        tracing::info!(path = ?path.display(), "write artifact");

        std::fs::write(&path, contents)
            .wrap_err_with(|| format!("failed to write artifact: {:?}", path.display()))?;

        Ok(path)
    }

    /// Read an artifact of this session.
    pub fn read(&self, stage: Stage, artifact: Artifact) -> Result<String> {
        let path = self.path(stage, artifact);
        std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read artifact: {:?}", path.display()))
    }

    /// Most recent artifact of a kind across all sessions under `root`.
    pub fn latest(root: &Path, stage: Stage, artifact: Artifact) -> Result<Option<PathBuf>> {
        if !root.exists() {
            return Ok(None);
        }

        let suffix = format!("_{}_{}", stage.as_str(), artifact.file_name());

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(root)
            .wrap_err_with(|| format!("failed to list store: {:?}", root.display()))?
        {
            let entry = entry?;
            if entry.file_name().to_string_lossy().ends_with(&suffix) {
                matches.push(entry.path());
            }
        }

        matches.sort();
        Ok(matches.pop())
    }
}
