//! Run parameters serialized for the detection backends.
//!
//! The wire format is shared with the backend executables and the host
//! bridge, so field names here are load-bearing: backends parse the JSON
//! payload positionally-named (`silenceCutoff`, `removeOver`, ...) and the
//! bridge returns timeline points as `{in, out, start}`.

use serde::{Deserialize, Serialize};

/// Which external detection backend computes the cut candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DetectionMethod {
    /// Amplitude-threshold silence detection.
    Loudness,

    /// Transcription-based speech detection; silences are the gaps between
    /// recognized speech segments.
    Whisper,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loudness => "loudness",
            Self::Whisper => "whisper",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whisper model size accepted by the transcription backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum WhisperModel {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Base => "base",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl std::fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timeline positions reported by the host for the clip under edit.
///
/// `in`/`out` bound the analyzed span; `start` is the clip's offset in the
/// sequence, which backends add back onto detected intervals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoints {
    #[serde(rename = "in")]
    pub in_point: f64,
    #[serde(rename = "out")]
    pub out_point: f64,
    pub start: f64,
}

/// The full parameter payload handed to a detection backend as its second
/// positional argument.
///
/// Immutable once serialized for the subprocess call. `model` and `language`
/// are present iff `method` is [`DetectionMethod::Whisper`]; the constructors
/// enforce that, so a loudness payload can never leak whisper fields.
#[derive(Debug, Clone, Serialize)]
pub struct JumpcutParams {
    #[serde(rename = "silenceCutoff")]
    pub silence_cutoff: f64,
    #[serde(rename = "removeOver")]
    pub remove_over: f64,
    #[serde(rename = "keepOver")]
    pub keep_over: f64,
    pub padding: f64,
    pub method: DetectionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<WhisperModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "in")]
    pub in_point: f64,
    #[serde(rename = "out")]
    pub out_point: f64,
    pub start: f64,
}

impl JumpcutParams {
    /// Parameters for a loudness-based run. Whisper-only fields stay absent.
    pub fn for_loudness(silence_cutoff: f64, remove_over: f64, keep_over: f64, padding: f64) -> Self {
        Self {
            silence_cutoff,
            remove_over,
            keep_over,
            padding,
            method: DetectionMethod::Loudness,
            model: None,
            language: None,
            in_point: 0.0,
            out_point: 0.0,
            start: 0.0,
        }
    }

    /// Parameters for a whisper-based run. `language` of `None` lets the
    /// backend auto-detect.
    pub fn for_whisper(
        silence_cutoff: f64,
        remove_over: f64,
        keep_over: f64,
        padding: f64,
        model: WhisperModel,
        language: Option<String>,
    ) -> Self {
        Self {
            silence_cutoff,
            remove_over,
            keep_over,
            padding,
            method: DetectionMethod::Whisper,
            model: Some(model),
            language,
            in_point: 0.0,
            out_point: 0.0,
            start: 0.0,
        }
    }

    /// Merge in the timeline points gathered from the host.
    pub fn with_timeline(mut self, points: TimelinePoints) -> Self {
        self.in_point = points.in_point;
        self.out_point = points.out_point;
        self.start = points.start;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loudness_payload_never_carries_whisper_fields() -> anyhow::Result<()> {
        let params = JumpcutParams::for_loudness(-80.0, 1.0, 0.3, 0.5);
        let json = serde_json::to_string(&params)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        assert_eq!(value["method"], "loudness");
        assert!(value.get("model").is_none());
        assert!(value.get("language").is_none());
        Ok(())
    }

    #[test]
    fn whisper_payload_carries_model_and_optional_language() -> anyhow::Result<()> {
        let params = JumpcutParams::for_whisper(
            -80.0,
            1.0,
            0.3,
            0.5,
            WhisperModel::Small,
            Some("en".to_string()),
        );
        let value: serde_json::Value = serde_json::to_value(&params)?;

        assert_eq!(value["method"], "whisper");
        assert_eq!(value["model"], "small");
        assert_eq!(value["language"], "en");
        Ok(())
    }

    #[test]
    fn whisper_payload_omits_language_when_auto_detecting() -> anyhow::Result<()> {
        let params =
            JumpcutParams::for_whisper(-80.0, 1.0, 0.3, 0.5, WhisperModel::Base, None);
        let value: serde_json::Value = serde_json::to_value(&params)?;

        assert_eq!(value["model"], "base");
        assert!(value.get("language").is_none());
        Ok(())
    }

    #[test]
    fn wire_names_match_the_backend_contract() -> anyhow::Result<()> {
        let params = JumpcutParams::for_loudness(-50.0, 1.0, 0.3, 0.5).with_timeline(TimelinePoints {
            in_point: 2.5,
            out_point: 30.0,
            start: 10.0,
        });
        let value: serde_json::Value = serde_json::to_value(&params)?;

        for key in ["silenceCutoff", "removeOver", "keepOver", "padding", "in", "out", "start"] {
            assert!(value.get(key).is_some(), "missing wire field {key}");
        }
        assert_eq!(value["in"], 2.5);
        assert_eq!(value["out"], 30.0);
        assert_eq!(value["start"], 10.0);
        Ok(())
    }

    #[test]
    fn timeline_points_parse_from_bridge_json() -> anyhow::Result<()> {
        let points: TimelinePoints = serde_json::from_str(r#"{"in": 0.0, "out": 12.5, "start": 4.0}"#)?;
        assert_eq!(points.out_point, 12.5);
        assert_eq!(points.start, 4.0);
        Ok(())
    }
}
