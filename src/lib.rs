//! `jumpcut`: detection-job orchestration for silence-based jump cuts.
//!
//! This crate drives external silence/speech-detection backends and turns
//! their findings into timeline edits through a host editor's scripting
//! bridge. It provides:
//! - Backend descriptors (which executable, which arguments, per method)
//! - Subprocess supervision with streamed output and failure classification
//! - Keyword-based progress mapping for coarse backend lifecycle stages
//! - Result extraction from log-interleaved stdout
//! - The run state machine tying it all together
//!
//! The detection itself and the timeline mutation are external collaborators;
//! the crate is deliberately only the orchestration between them.

// High-level API (most consumers should start here).
pub mod config;
pub mod orchestrator;

// The run's collaborators: backend metadata, subprocess supervision, the
// host-editor bridge.
pub mod backend;
pub mod bridge;
pub mod runner;

// Parameters, progress, and result handling.
pub mod extract;
pub mod params;
pub mod progress;

// Error taxonomy.
pub mod error;

// Logging configuration (binaries only).
#[cfg(feature = "logging")]
pub mod logging;

pub use backend::{BackendDescriptor, BackendRegistry, BackendStatus};
pub use bridge::{ScriptHost, SequenceBridge};
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{CutList, Interval};
pub use orchestrator::{Orchestrator, RunRequest, RunSummary};
pub use params::{DetectionMethod, JumpcutParams, TimelinePoints, WhisperModel};
pub use progress::{ProgressState, ProgressUpdate, Stage};
pub use runner::ProcessRunner;
