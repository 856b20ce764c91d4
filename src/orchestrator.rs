//! The top-level state machine for one jump-cut run.
//!
//! A run walks `Idle → CheckingPreconditions → GatheringParams → Running →
//! ProcessingResult → ApplyingCuts → Succeeded | Failed`. Each bridge call
//! and the backend subprocess are the suspension points; the single mutable
//! [`ProgressState`] is only written between them, so the whole run is one
//! cooperative sequence with no locking.
//!
//! Failure policy: the first error wins, the run is terminal (no partial
//! retries), and the caller always observes the progress display restored to
//! idle after the terminal report.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::backend::BackendRegistry;
use crate::bridge::{ScriptHost, SequenceBridge};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::extract;
use crate::params::{DetectionMethod, JumpcutParams, WhisperModel};
use crate::progress::{self, ProgressState, Stage};
use crate::runner::ProcessRunner;

/// Everything the user chose for one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub silence_cutoff: f64,
    pub remove_over: f64,
    pub keep_over: f64,
    pub padding: f64,
    pub method: DetectionMethod,
    /// Whisper model size; ignored for loudness runs.
    pub model: Option<WhisperModel>,
    /// Whisper language hint; `None` auto-detects. Ignored for loudness runs.
    pub language: Option<String>,
    /// Whether the host should back up the sequence before cutting.
    pub backup: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub silence_count: usize,
    pub cuts_applied: usize,
}

impl RunSummary {
    pub fn message(&self) -> String {
        format!("Success! Applied {} cuts.", self.cuts_applied)
    }
}

/// Drives a full detection-and-apply run against a [`ScriptHost`].
///
/// At most one run may be active per orchestrator; a second concurrent `run`
/// fails fast with [`Error::RunInProgress`] instead of queueing. The guard is
/// the orchestrator's own flag rather than a disabled UI control, so the
/// single-flight guarantee holds outside any panel context.
pub struct Orchestrator {
    registry: BackendRegistry,
    runner: ProcessRunner,
    in_flight: AtomicBool,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            registry: BackendRegistry::new(&config),
            runner: ProcessRunner::from_config(&config),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Execute one run, reporting progress through `on_progress`.
    ///
    /// `on_progress` observes every state change, ending with a terminal
    /// report (`Succeeded` at 100% or `Failed` with the error message)
    /// followed by the idle reset.
    pub async fn run<H, F>(&self, host: &H, request: RunRequest, mut on_progress: F) -> Result<RunSummary>
    where
        H: ScriptHost,
        F: FnMut(&ProgressState),
    {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(Error::RunInProgress);
        }
        let _guard = FlightGuard(&self.in_flight);

        let mut state = ProgressState::idle();
        let result = self
            .run_stages(host, &request, &mut state, &mut on_progress)
            .await;

        match &result {
            Ok(summary) => {
                state.advance(Stage::Succeeded, 100, "Complete!");
                on_progress(&state);
                info!(
                    cuts_applied = summary.cuts_applied,
                    silence_count = summary.silence_count,
                    "jump cut run succeeded"
                );
            }
            Err(err) => {
                state.fail(err.to_string());
                on_progress(&state);
                warn!(error = %err, "jump cut run failed");
            }
        }

        // The display always returns to inactive, whichever way the run ended.
        state.reset();
        on_progress(&state);

        result
    }

    async fn run_stages<H, F>(
        &self,
        host: &H,
        request: &RunRequest,
        state: &mut ProgressState,
        on_progress: &mut F,
    ) -> Result<RunSummary>
    where
        H: ScriptHost,
        F: FnMut(&ProgressState),
    {
        let bridge = SequenceBridge::new(host);

        state.advance(Stage::CheckingPreconditions, 0, "Checking prerequisites...");
        on_progress(state);
        if !bridge.check_preconditions().await {
            return Err(Error::PreconditionNotMet);
        }

        state.advance(Stage::GatheringParams, 20, "Getting media path...");
        on_progress(state);
        let media_path = bridge.media_path().await?;

        state.advance(Stage::GatheringParams, 30, "Preparing parameters...");
        on_progress(state);
        let points = bridge.in_out_start_points().await?;
        let params = build_params(request).with_timeline(points);
        let params_json = serde_json::to_string(&params)?;

        let running_message = match params.method {
            DetectionMethod::Whisper => "Running AI speech detection...",
            DetectionMethod::Loudness => "Running loudness detection...",
        };
        state.advance(Stage::Running, 40, running_message);
        on_progress(state);

        let descriptor = self.registry.descriptor(params.method);
        let args = BackendRegistry::build_args(Path::new(&media_path), &params, &params_json);
        let method = params.method;
        let stdout = self
            .runner
            .run(&descriptor, &args, |line| {
                if let Some(update) = progress::observe(line, method) {
                    state.advance(Stage::Running, update.percent, update.message);
                    on_progress(state);
                }
            })
            .await?;

        state.advance(Stage::ProcessingResult, 80, "Analysis complete!");
        on_progress(state);
        state.advance(Stage::ProcessingResult, 85, "Processing results...");
        on_progress(state);
        let cuts = extract(&stdout)?;

        state.advance(Stage::ApplyingCuts, 90, "Applying cuts to timeline...");
        on_progress(state);
        let silences_json = serde_json::to_string(&cuts.silences)?;
        bridge.apply_cuts(&silences_json, request.backup).await?;

        Ok(RunSummary {
            silence_count: cuts.silences.len(),
            cuts_applied: cuts.cuts_applied(),
        })
    }
}

/// Clears the in-flight flag on every exit path, panics included.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn build_params(request: &RunRequest) -> JumpcutParams {
    match request.method {
        DetectionMethod::Loudness => JumpcutParams::for_loudness(
            request.silence_cutoff,
            request.remove_over,
            request.keep_over,
            request.padding,
        ),
        DetectionMethod::Whisper => JumpcutParams::for_whisper(
            request.silence_cutoff,
            request.remove_over,
            request.keep_over,
            request.padding,
            request.model.unwrap_or_default(),
            request.language.clone(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loudness_requests_drop_whisper_fields() {
        let request = RunRequest {
            silence_cutoff: -80.0,
            remove_over: 1.0,
            keep_over: 0.3,
            padding: 0.5,
            method: DetectionMethod::Loudness,
            model: Some(WhisperModel::Large),
            language: Some("en".to_owned()),
            backup: false,
        };

        let params = build_params(&request);
        assert!(params.model.is_none());
        assert!(params.language.is_none());
    }

    #[test]
    fn whisper_requests_default_the_model() {
        let request = RunRequest {
            silence_cutoff: -80.0,
            remove_over: 1.0,
            keep_over: 0.3,
            padding: 0.5,
            method: DetectionMethod::Whisper,
            model: None,
            language: None,
            backup: false,
        };

        let params = build_params(&request);
        assert_eq!(params.model, Some(WhisperModel::Base));
    }

    #[test]
    fn summary_message_reports_cut_count() {
        let summary = RunSummary {
            silence_count: 2,
            cuts_applied: 1,
        };
        assert_eq!(summary.message(), "Success! Applied 1 cuts.");
    }
}
