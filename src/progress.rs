//! Progress reporting for a detection run.
//!
//! Backends narrate their lifecycle on stdout in human-readable lines. We map
//! known phrases onto fixed percentage checkpoints rather than deriving
//! progress from byte or line counts; the checkpoints reflect coarse backend
//! stages (model load, transcription, gap detection). Keeping [`observe`] a
//! pure function over the keyword table means it can be unit-tested without
//! ever spawning a process.

use serde::Serialize;

use crate::params::DetectionMethod;

/// Lifecycle stage of a run, mirroring the orchestrator's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    CheckingPreconditions,
    GatheringParams,
    Running,
    ProcessingResult,
    ApplyingCuts,
    Succeeded,
    Failed,
}

/// A checkpoint fired by a recognized backend output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub message: &'static str,
}

/// Map one stdout line to a progress checkpoint, if it matches the keyword
/// table for the active backend.
pub fn observe(line: &str, method: DetectionMethod) -> Option<ProgressUpdate> {
    match method {
        DetectionMethod::Whisper => {
            if line.contains("Loading Whisper model") {
                Some(ProgressUpdate {
                    percent: 50,
                    message: "Loading AI model...",
                })
            } else if line.contains("Transcribing audio") {
                Some(ProgressUpdate {
                    percent: 60,
                    message: "Transcribing speech...",
                })
            } else if line.contains("Detected") && line.contains("silence") {
                Some(ProgressUpdate {
                    percent: 75,
                    message: "Detecting silence gaps...",
                })
            } else {
                None
            }
        }
        // The loudness backend emits a single burst of output; any line means
        // analysis is underway.
        DetectionMethod::Loudness => Some(ProgressUpdate {
            percent: 60,
            message: "Analyzing audio levels...",
        }),
    }
}

/// The single mutable progress record for a run.
///
/// Owned by the orchestrator and written only between its suspension points,
/// so no locking is needed. `advance` never lowers the displayed percent,
/// even if a backend emits its keywords out of the expected order; only
/// [`ProgressState::reset`] (start of a run, terminal cleanup) returns to 0.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressState {
    pub stage: Stage,
    pub percent: u8,
    pub message: String,
}

impl ProgressState {
    pub fn idle() -> Self {
        Self {
            stage: Stage::Idle,
            percent: 0,
            message: String::new(),
        }
    }

    /// Move to `stage` with a percent clamped to be non-decreasing.
    pub fn advance(&mut self, stage: Stage, percent: u8, message: impl Into<String>) {
        self.stage = stage;
        self.percent = self.percent.max(percent.min(100));
        self.message = message.into();
    }

    /// Terminal failure: keep the reached percent, surface the message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.stage = Stage::Failed;
        self.message = message.into();
    }

    /// Restore the inactive display.
    pub fn reset(&mut self) {
        *self = Self::idle();
    }

    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Idle
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::idle()
    }
}
