use thiserror::Error;

/// Jumpcut's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Jumpcut's crate-wide error type.
///
/// Every terminal run failure maps to exactly one of these variants, and the
/// orchestrator surfaces the variant's message verbatim to the user. This is
/// intentionally decoupled from `anyhow` so downstream libraries aren't forced
/// to adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// The active sequence does not satisfy the jump-cut prerequisites.
    #[error(
        "timeline prerequisites not met: there must be a single linked video/audio pair on tracks V1 and A1"
    )]
    PreconditionNotMet,

    /// A scripting-bridge query returned null/empty or malformed data.
    #[error("host bridge query failed: {0}")]
    BridgeQuery(String),

    /// The detection backend could not be launched at all.
    #[error("failed to launch detection backend: {0}")]
    Spawn(String),

    /// The detection backend exited with a nonzero status.
    #[error("detection backend failed: exit code {0}")]
    NonZeroExit(i32),

    /// The detection backend wrote to stderr. The first line wins; any later
    /// output or exit status is not consulted.
    #[error("detection backend error: {0}")]
    StderrEmitted(String),

    /// The detection backend reported a failure in its result object
    /// (`{"error": ...}` on stdout with a clean exit).
    #[error("detection backend reported: {0}")]
    BackendReported(String),

    /// Backend stdout contained no parseable result line.
    #[error("could not parse detection output: {0}")]
    Parse(String),

    /// The backend ran to completion but found nothing to cut. This is an
    /// expected outcome for quiet-free media, not a malformed-output condition.
    #[error("no silences detected")]
    NoSilencesDetected,

    /// The host editor rejected or ignored the cut-application request.
    #[error("failed to apply cuts to the timeline")]
    Apply,

    /// Another run is still active; at most one run may be in flight.
    #[error("a jump cut run is already in progress")]
    RunInProgress,

    /// The detection backend exceeded the configured deadline and was killed.
    #[error("detection backend timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn bridge_query(message: impl Into<String>) -> Self {
        Self::BridgeQuery(message.into())
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
