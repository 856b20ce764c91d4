//! The scripting-bridge seam to the host editor.
//!
//! The host evaluates a command string against the active project and hands
//! back a scalar result, or null when the call fails; there is no structured
//! error channel. [`ScriptHost`] models exactly that contract, and
//! [`SequenceBridge`] layers the four typed operations the pipeline needs on
//! top of it. Keeping the seam this narrow makes the orchestrator testable
//! with a canned host.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::params::TimelinePoints;

/// Host-editor evaluation of a single script command.
///
/// Implementations resolve with the host's raw response, or `None` when the
/// host returned null/falsy. Each call is an independent asynchronous
/// boundary with a single resolution.
#[async_trait]
pub trait ScriptHost: Send + Sync {
    async fn eval(&self, script: &str) -> Option<String>;
}

/// Typed wrapper over the four host commands used by a jump-cut run.
pub struct SequenceBridge<'a, H: ScriptHost> {
    host: &'a H,
}

impl<'a, H: ScriptHost> SequenceBridge<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Whether the active sequence has exactly one linked video/audio pair on
    /// the two primary tracks. Anything but a literal `"true"` fails the
    /// check; an absent response is indistinguishable from `false` here.
    pub async fn check_preconditions(&self) -> bool {
        matches!(
            self.host.eval("checkOneLinkedClipPair()").await.as_deref(),
            Some("true")
        )
    }

    /// Absolute path of the media under edit.
    pub async fn media_path(&self) -> Result<String> {
        match self.host.eval("getMediaPath()").await {
            Some(path) if !path.trim().is_empty() => Ok(path),
            _ => Err(Error::bridge_query("error getting media path")),
        }
    }

    /// Timeline in/out/start points, as `{in, out, start}` JSON.
    pub async fn in_out_start_points(&self) -> Result<TimelinePoints> {
        let raw = self
            .host
            .eval("getInOutStartPoints()")
            .await
            .ok_or_else(|| Error::bridge_query("error getting in and out points"))?;

        serde_json::from_str(&raw)
            .map_err(|err| Error::bridge_query(format!("malformed in/out points: {err}")))
    }

    /// Ask the host to apply the cut list to the active sequence.
    ///
    /// `silences_json` is embedded in a quoted script argument, so its own
    /// quotes must be escaped for the host's parser.
    pub async fn apply_cuts(&self, silences_json: &str, backup: bool) -> Result<()> {
        let script = format!(
            r#"jumpCutActiveSequence("{}", "{}")"#,
            escape_script_string(silences_json),
            backup
        );

        match self.host.eval(&script).await {
            Some(result) if !result.is_empty() => Ok(()),
            _ => Err(Error::Apply),
        }
    }
}

fn escape_script_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Canned host: maps a script prefix to a response, records every call.
    #[derive(Default)]
    struct CannedHost {
        responses: HashMap<&'static str, Option<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl CannedHost {
        fn respond(mut self, prefix: &'static str, response: Option<&str>) -> Self {
            self.responses.insert(prefix, response.map(str::to_owned));
            self
        }
    }

    #[async_trait]
    impl ScriptHost for CannedHost {
        async fn eval(&self, script: &str) -> Option<String> {
            self.calls.lock().unwrap().push(script.to_owned());
            self.responses
                .iter()
                .find(|(prefix, _)| script.starts_with(*prefix))
                .and_then(|(_, response)| response.clone())
        }
    }

    #[tokio::test]
    async fn only_a_literal_true_passes_preconditions() {
        let truthy = CannedHost::default().respond("checkOneLinkedClipPair", Some("true"));
        assert!(SequenceBridge::new(&truthy).check_preconditions().await);

        let falsy = CannedHost::default().respond("checkOneLinkedClipPair", Some("false"));
        assert!(!SequenceBridge::new(&falsy).check_preconditions().await);

        let absent = CannedHost::default();
        assert!(!SequenceBridge::new(&absent).check_preconditions().await);
    }

    #[tokio::test]
    async fn empty_media_path_is_a_bridge_failure() {
        let host = CannedHost::default().respond("getMediaPath", Some("  "));
        let err = SequenceBridge::new(&host).media_path().await.unwrap_err();
        assert!(matches!(err, Error::BridgeQuery(_)));
    }

    #[tokio::test]
    async fn points_parse_and_malformed_points_fail() -> anyhow::Result<()> {
        let host = CannedHost::default()
            .respond("getInOutStartPoints", Some(r#"{"in":1.0,"out":9.5,"start":3.0}"#));
        let points = SequenceBridge::new(&host).in_out_start_points().await?;
        assert_eq!(points.out_point, 9.5);

        let bad = CannedHost::default().respond("getInOutStartPoints", Some("not json"));
        let err = SequenceBridge::new(&bad)
            .in_out_start_points()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BridgeQuery(_)));
        Ok(())
    }

    #[tokio::test]
    async fn apply_escapes_the_embedded_json() -> anyhow::Result<()> {
        let host = CannedHost::default().respond("jumpCutActiveSequence", Some("ok"));
        SequenceBridge::new(&host)
            .apply_cuts(r#"[{"start":0.0,"end":2.0}]"#, true)
            .await?;

        let calls = host.calls.lock().unwrap();
        let script = calls.last().expect("one call recorded");
        assert!(script.starts_with(r#"jumpCutActiveSequence("[{\"start\""#));
        assert!(script.ends_with(r#"", "true")"#));
        Ok(())
    }

    #[tokio::test]
    async fn absent_apply_response_is_an_apply_error() {
        let host = CannedHost::default();
        let err = SequenceBridge::new(&host)
            .apply_cuts("[]", false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Apply));
    }
}
