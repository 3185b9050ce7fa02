//! Subprocess correction service.
//!
//! Runs an external program once per batch. The program receives a JSON request
//! on stdin and must print a JSON array with one corrected line per input line.
//! A program still running past its timeout is killed and the batch fails.

use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use subweave_core::traits::{BoxError, CorrectionService};

/// Interval between exit checks while waiting on the program
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Request body written to the program's stdin.
#[derive(Debug, Serialize)]
struct Request<'a> {
    lines: &'a [String],
    reference: &'a str,
}

/// Correction service that shells out to a user-supplied program.
#[derive(Clone, Debug)]
pub struct CommandService {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Per-call deadline; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl CommandService {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Wait for the child to exit, killing it once the deadline passes.
    fn wait(&self, child: &mut Child) -> Result<ExitStatus, BoxError> {
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }

            if Instant::now() >= deadline {
                tracing::warn!(program = ?self.program.display(), ?timeout, "killing correction program");
                // the child may exit between try_wait and kill
                let _ = child.kill();
                child.wait()?;
                return Err(format!(
                    "{:?} timed out after {:.1}s",
                    self.program.display(),
                    timeout.as_secs_f32()
                )
                .into());
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl CorrectionService for CommandService {
    fn correct(&self, lines: &[String], reference: &str) -> Result<Vec<String>, BoxError> {
        let request = serde_json::to_vec(&Request { lines, reference })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| format!("failed to start {:?}: {e}", self.program.display()))?;

        let mut stdin = child.stdin.take().ok_or("child stdin unavailable")?;
        let mut stdout = child.stdout.take().ok_or("child stdout unavailable")?;

        // pipe I/O runs off this thread so a chatty child cannot deadlock on a full pipe
        let writer = thread::spawn(move || stdin.write_all(&request));
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        // on timeout the pipe threads are left detached; they end once the pipes close
        let status = self.wait(&mut child)?;

        let stdout = reader.join().map_err(|_| "stdout reader panicked")??;
        writer.join().map_err(|_| "stdin writer panicked")??;

        if !status.success() {
            return Err(format!("{:?} exited with {}", self.program.display(), status).into());
        }

        let corrected: Vec<String> = serde_json::from_slice(&stdout)
            .map_err(|e| format!("invalid response from {:?}: {e}", self.program.display()))?;

        Ok(corrected.into_iter().map(|line| line.trim().to_string()).collect())
    }
}
