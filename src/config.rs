//! Startup configuration for the jump-cut pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration constructed once at startup and passed explicitly into the
/// [`crate::Orchestrator`].
///
/// There is deliberately no ambient/global state here: the backend install
/// directory is the caller's to decide (a panel passes its extension dir, the
/// CLI passes a flag, tests pass a temp dir).
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the detection backend executables.
    pub backend_dir: PathBuf,

    /// Optional deadline for a single backend run. `None` preserves the
    /// wait-forever behavior of the original panel.
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(backend_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend_dir: backend_dir.into(),
            timeout: None,
        }
    }

    /// Kill the backend and fail the run if it exceeds `secs` seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }
}
