//! Static metadata for the detection backend executables.
//!
//! A backend is an external executable with a fixed contract: positional
//! arguments `<mediaPath> <paramsJSON>` (plus `--method`/`--model` flags for
//! the whisper variant), progress lines and one JSON result object on stdout,
//! stderr reserved for fatal errors, exit code 0 on success. This module only
//! describes backends; launching them is [`crate::runner`]'s job.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::params::{DetectionMethod, JumpcutParams};

/// Resolved launch metadata for one detection backend.
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    /// Absolute path of the executable. Existence is not pre-checked; spawn
    /// time is authoritative.
    pub executable: PathBuf,

    /// Directory the backend is launched from. Backends resolve bundled
    /// resources (models, codec helpers) relative to their own location.
    pub working_dir: PathBuf,
}

/// Health-probe result for one backend, used by the CLI `doctor` flow.
#[derive(Debug, Clone)]
pub struct BackendStatus {
    pub method: DetectionMethod,
    pub executable: PathBuf,
    pub present: bool,
}

/// Maps a [`DetectionMethod`] to its executable. Built once at startup from
/// [`Config`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backend_dir: PathBuf,
}

impl BackendRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            backend_dir: config.backend_dir.clone(),
        }
    }

    /// Pure lookup; no filesystem access.
    pub fn descriptor(&self, method: DetectionMethod) -> BackendDescriptor {
        BackendDescriptor {
            executable: self.backend_dir.join(executable_name(method)),
            working_dir: self.backend_dir.clone(),
        }
    }

    /// Build the argument list for a backend invocation.
    ///
    /// Loudness runs get exactly `[mediaPath, paramsJSON]`. Whisper runs
    /// append `--method whisper --model <size>` as trailing flags, mirroring
    /// what the whisper backend's argument parser expects.
    pub fn build_args(media_path: &Path, params: &JumpcutParams, params_json: &str) -> Vec<String> {
        let mut args = vec![
            media_path.to_string_lossy().into_owned(),
            params_json.to_owned(),
        ];

        if params.method == DetectionMethod::Whisper {
            args.push("--method".to_owned());
            args.push("whisper".to_owned());
            args.push("--model".to_owned());
            args.push(params.model.unwrap_or_default().as_str().to_owned());
        }

        args
    }

    /// Report which backend executables are actually installed.
    ///
    /// Diagnostics only; the run pipeline never calls this and relies on the
    /// OS rejecting the spawn instead.
    pub fn verify(&self) -> Vec<BackendStatus> {
        [DetectionMethod::Loudness, DetectionMethod::Whisper]
            .into_iter()
            .map(|method| {
                let executable = self.backend_dir.join(executable_name(method));
                let present = executable.is_file();
                BackendStatus {
                    method,
                    executable,
                    present,
                }
            })
            .collect()
    }
}

/// Executable file name for a detection method, per OS naming convention.
fn executable_name(method: DetectionMethod) -> &'static str {
    #[cfg(windows)]
    {
        match method {
            DetectionMethod::Loudness => "jumpcut.exe",
            DetectionMethod::Whisper => "whisper_jumpcut.exe",
        }
    }
    #[cfg(not(windows))]
    {
        match method {
            DetectionMethod::Loudness => "jumpcut",
            DetectionMethod::Whisper => "whisper_jumpcut",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WhisperModel;

    fn registry() -> BackendRegistry {
        BackendRegistry::new(&Config::new("/opt/jumpcut/dist"))
    }

    #[test]
    fn descriptor_joins_install_dir_and_method_name() {
        let descriptor = registry().descriptor(DetectionMethod::Whisper);

        #[cfg(not(windows))]
        assert_eq!(
            descriptor.executable,
            PathBuf::from("/opt/jumpcut/dist/whisper_jumpcut")
        );
        #[cfg(windows)]
        assert_eq!(
            descriptor.executable,
            PathBuf::from("/opt/jumpcut/dist/whisper_jumpcut.exe")
        );

        assert_eq!(descriptor.working_dir, PathBuf::from("/opt/jumpcut/dist"));
    }

    #[test]
    fn loudness_args_are_exactly_media_and_params() {
        let params = JumpcutParams::for_loudness(-80.0, 1.0, 0.3, 0.5);
        let args = BackendRegistry::build_args(Path::new("/media/clip.mp4"), &params, "{}");

        assert_eq!(args, vec!["/media/clip.mp4".to_owned(), "{}".to_owned()]);
    }

    #[test]
    fn whisper_args_carry_trailing_method_and_model_flags() {
        let params =
            JumpcutParams::for_whisper(-80.0, 1.0, 0.3, 0.5, WhisperModel::Medium, None);
        let args = BackendRegistry::build_args(Path::new("/media/clip.mp4"), &params, "{}");

        assert_eq!(
            &args[2..],
            &[
                "--method".to_owned(),
                "whisper".to_owned(),
                "--model".to_owned(),
                "medium".to_owned(),
            ]
        );
    }

    #[test]
    fn verify_reports_missing_executables() {
        let statuses = registry().verify();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| !s.present));
    }
}
