//! Isolates and validates the structured result in raw backend stdout.
//!
//! Backend stdout interleaves human-readable progress lines with exactly one
//! machine-readable JSON object. Scanning for the first line that starts with
//! `{` isolates it without requiring backends to use a separate channel.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One detected low-value span, in sequence time (seconds).
///
/// Interval semantics belong to the backend; aside from counting, the
/// pipeline hands them through opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

/// The validated cut list extracted from a successful backend run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutList {
    pub silences: Vec<Interval>,
}

impl CutList {
    /// N silence boundaries splice into N-1 retained segments, so the count
    /// reported to the user is one less than the interval count.
    pub fn cuts_applied(&self) -> usize {
        self.silences.len().saturating_sub(1)
    }
}

/// What a backend may actually print: a cut list, or a self-reported failure
/// object (`{"error": "..."}` with a clean exit).
#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    silences: Option<Vec<Interval>>,
    #[serde(default)]
    error: Option<String>,
}

/// Extract the structured result from raw stdout.
///
/// Scans lines in order and parses the first whose trimmed form starts with
/// `{`; if no line qualifies, the whole trimmed output is tried instead.
/// Distinguishes three non-success outcomes: unparseable output
/// ([`Error::Parse`]), a backend-reported failure ([`Error::BackendReported`]),
/// and a valid result with nothing to cut ([`Error::NoSilencesDetected`]).
pub fn extract(raw_stdout: &str) -> Result<CutList> {
    let candidate = raw_stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('{'));

    let parsed: RawResult = match candidate {
        Some(line) => serde_json::from_str(line),
        None => serde_json::from_str(raw_stdout.trim()),
    }
    .map_err(|err| Error::parse(err.to_string()))?;

    if let Some(detail) = parsed.error {
        return Err(Error::BackendReported(detail));
    }

    match parsed.silences {
        Some(silences) if !silences.is_empty() => Ok(CutList { silences }),
        _ => Err(Error::NoSilencesDetected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULT_LINE: &str = r#"{"silences":[{"start":0.0,"end":2.0},{"start":5.0,"end":6.0}]}"#;

    #[test]
    fn finds_the_result_line_regardless_of_position() -> Result<()> {
        let interleaved = [
            format!("{RESULT_LINE}\nLoading Whisper model...\n"),
            format!("Loading Whisper model...\n{RESULT_LINE}\ntrailing log\n"),
            format!("a\nb\nc\n  {RESULT_LINE}  \n"),
        ];

        for stdout in interleaved {
            let cuts = extract(&stdout)?;
            assert_eq!(cuts.silences.len(), 2);
            assert_eq!(cuts.silences[1].start, 5.0);
        }
        Ok(())
    }

    #[test]
    fn indented_result_line_still_parses() -> Result<()> {
        let cuts = extract(&format!("   {RESULT_LINE}\n"))?;
        assert_eq!(cuts.cuts_applied(), 1);
        Ok(())
    }

    #[test]
    fn unparseable_output_is_a_parse_error() {
        let err = extract("no result here\njust logs\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));

        let err = extract("{this is not json\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn empty_silences_is_not_a_parse_error() {
        let err = extract(r#"{"silences":[]}"#).unwrap_err();
        assert!(matches!(err, Error::NoSilencesDetected));

        let err = extract(r#"{"other":"fields"}"#).unwrap_err();
        assert!(matches!(err, Error::NoSilencesDetected));
    }

    #[test]
    fn backend_reported_error_objects_surface_their_detail() {
        let err = extract(r#"{"error":"FFmpeg failed: no audio stream"}"#).unwrap_err();
        match err {
            Error::BackendReported(detail) => assert!(detail.contains("no audio stream")),
            other => panic!("expected BackendReported, got {other:?}"),
        }
    }

    #[test]
    fn interval_count_maps_to_cuts_applied() -> Result<()> {
        let cuts = extract(RESULT_LINE)?;
        assert_eq!(cuts.silences.len(), 2);
        assert_eq!(cuts.cuts_applied(), 1);
        Ok(())
    }
}
