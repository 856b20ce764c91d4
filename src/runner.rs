//! Launches a detection backend and supervises its output streams.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::backend::BackendDescriptor;
use crate::config::Config;
use crate::error::{Error, Result};

/// Runs one detection backend to completion.
///
/// Stdout is streamed line-by-line so progress feedback can update during a
/// long analysis (transcription-based detection takes seconds to minutes);
/// every line is forwarded to the caller's observer and accumulated for the
/// result extractor.
///
/// Failure classification follows the backend contract:
/// - the first stderr line fails the run immediately, before the exit code is
///   ever known ([`Error::StderrEmitted`]);
/// - a nonzero exit code becomes [`Error::NonZeroExit`];
/// - a spawn refusal (missing or non-executable file) becomes
///   [`Error::Spawn`] without any streaming.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<std::time::Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.timeout,
        }
    }

    /// Run the backend described by `descriptor` with `args`, forwarding each
    /// stdout line to `on_stdout` as it arrives.
    ///
    /// Resolves exactly once. When a deadline is configured and expires, the
    /// child is killed and the run fails with [`Error::Timeout`]; with no
    /// deadline a hung backend blocks indefinitely, matching the original
    /// panel behavior.
    pub async fn run<F>(
        &self,
        descriptor: &BackendDescriptor,
        args: &[String],
        mut on_stdout: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        debug!(
            executable = %descriptor.executable.display(),
            ?args,
            "spawning detection backend"
        );

        // Spawned directly, never through a shell. kill_on_drop covers the
        // early-return paths (stderr, timeout) so no orphan keeps running.
        let mut child = Command::new(&descriptor.executable)
            .args(args)
            .current_dir(&descriptor.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| Error::Spawn(err.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Spawn("stdout pipe was not captured".to_owned()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Spawn("stderr pipe was not captured".to_owned()))?;

        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();

        let supervise = async {
            let mut captured = String::new();
            let mut stderr_open = true;

            loop {
                tokio::select! {
                    line = out_lines.next_line() => match line? {
                        Some(line) => {
                            on_stdout(&line);
                            captured.push_str(&line);
                            captured.push('\n');
                        }
                        None => break,
                    },
                    line = err_lines.next_line(), if stderr_open => match line? {
                        Some(line) => return Err(Error::StderrEmitted(line)),
                        None => stderr_open = false,
                    },
                }
            }

            // Stdout closed without a stderr signal; drain any straggling
            // stderr line that raced the pipe shutdown.
            if stderr_open {
                if let Some(line) = err_lines.next_line().await? {
                    return Err(Error::StderrEmitted(line));
                }
            }

            let status = child.wait().await?;
            match status.code() {
                Some(0) => Ok(captured),
                Some(code) => Err(Error::NonZeroExit(code)),
                // Killed by a signal; there is no exit code to report.
                None => Err(Error::NonZeroExit(-1)),
            }
        };

        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, supervise).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        executable = %descriptor.executable.display(),
                        timeout_secs = limit.as_secs(),
                        "detection backend timed out; killing process"
                    );
                    Err(Error::Timeout(limit.as_secs()))
                }
            },
            None => supervise.await,
        }
    }
}
