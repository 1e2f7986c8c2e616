//! Transport seam between the device façades and the device itself.
//!
//! The parsers never talk to a device. A [`Transport`] returns the raw
//! output of one command or fails; connection handling, retries and
//! authentication belong to the implementation. Two offline transports are
//! provided for tests and fixture-driven tooling.

use std::collections::HashMap;
use std::sync::Mutex;

use log::{debug, trace};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Source of raw command output.
pub trait Transport: Send + Sync {
    /// Run `command` and return its raw output.
    fn fetch(&self, command: &str) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn fetch(&self, command: &str) -> Result<String, TransportError> {
        (**self).fetch(command)
    }
}

/// Transport answering every command with a fixed output.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    outputs: HashMap<String, String>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output returned for `command`.
    pub fn with_output(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }
}

impl Transport for StaticTransport {
    fn fetch(&self, command: &str) -> Result<String, TransportError> {
        self.outputs
            .get(command)
            .cloned()
            .ok_or_else(|| TransportError::NoOutput(command.to_string()))
    }
}

/// One recorded command execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecordedOutput {
    pub command: String,
    /// Raw output, or the failure message when `success` is false.
    pub output: String,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

/// Offline transport replaying recorded outputs.
///
/// Each recording is consumed once. Repeated fetches of the same command
/// return its recordings in file order.
#[derive(Debug)]
pub struct ReplayTransport {
    entries: Vec<RecordedOutput>,
    consumed: Mutex<Vec<bool>>,
}

impl ReplayTransport {
    /// Build a replayer from recorded outputs.
    pub fn new(entries: Vec<RecordedOutput>) -> Self {
        let consumed = Mutex::new(vec![false; entries.len()]);
        Self { entries, consumed }
    }

    /// Restore recordings from JSONL lines; blank lines are ignored.
    pub fn from_jsonl(jsonl: &str) -> Result<Self, TransportError> {
        let mut entries = Vec::new();
        for (i, line) in jsonl.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: RecordedOutput = serde_json::from_str(line)
                .map_err(|e| TransportError::Decode(format!("line {}: {e}", i + 1)))?;
            entries.push(entry);
        }
        debug!("loaded {} recorded outputs", entries.len());
        Ok(Self::new(entries))
    }

    /// Export all recordings as JSONL.
    pub fn to_jsonl(&self) -> Result<String, TransportError> {
        let mut lines = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let line = serde_json::to_string(entry)
                .map_err(|e| TransportError::Decode(format!("record encode error: {e}")))?;
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    /// Number of recordings not yet replayed.
    pub fn remaining(&self) -> Result<usize, TransportError> {
        let guard = self
            .consumed
            .lock()
            .map_err(|e| TransportError::State(format!("replay lock error: {e}")))?;
        Ok(guard.iter().filter(|done| !**done).count())
    }
}

impl Transport for ReplayTransport {
    fn fetch(&self, command: &str) -> Result<String, TransportError> {
        let mut guard = self
            .consumed
            .lock()
            .map_err(|e| TransportError::State(format!("replay lock error: {e}")))?;

        let found = self
            .entries
            .iter()
            .enumerate()
            .find(|(i, entry)| !guard[*i] && entry.command == command);

        let Some((i, entry)) = found else {
            return Err(TransportError::NoOutput(command.to_string()));
        };
        guard[i] = true;
        trace!("replaying recording {i} for '{command}'");

        if entry.success {
            Ok(entry.output.clone())
        } else {
            Err(TransportError::CommandFailed {
                command: command.to_string(),
                message: entry.output.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{"command":"show version","output":"Junos: 21.4R1.12"}

{"command":"show version","output":"Junos: 22.2R3.15","success":true}
{"command":"show arp no-resolve","output":"error: permission denied","success":false}
"#;

    #[test]
    fn static_transport_returns_configured_output() {
        let transport = StaticTransport::new().with_output("show version", "Junos: 21.4R1.12");
        assert_eq!(transport.fetch("show version").expect("fetch"), "Junos: 21.4R1.12");
        assert!(matches!(
            transport.fetch("show arp").expect_err("missing"),
            TransportError::NoOutput(_)
        ));
    }

    #[test]
    fn replay_returns_recordings_in_order_once() {
        let transport = ReplayTransport::from_jsonl(FIXTURE).expect("load");
        assert_eq!(transport.remaining().expect("remaining"), 3);
        assert_eq!(transport.fetch("show version").expect("first"), "Junos: 21.4R1.12");
        assert_eq!(transport.fetch("show version").expect("second"), "Junos: 22.2R3.15");
        assert!(matches!(
            transport.fetch("show version").expect_err("exhausted"),
            TransportError::NoOutput(_)
        ));
        assert_eq!(transport.remaining().expect("remaining"), 1);
    }

    #[test]
    fn recorded_failure_is_reported() {
        let transport = ReplayTransport::from_jsonl(FIXTURE).expect("load");
        match transport.fetch("show arp no-resolve").expect_err("failure") {
            TransportError::CommandFailed { message, .. } => {
                assert_eq!(message, "error: permission denied");
            }
            other => panic!("unexpected error type: {other}"),
        }
    }

    #[test]
    fn undecodable_line_names_its_position() {
        let err = ReplayTransport::from_jsonl("{\"command\":\"x\",\"output\":\"\"}\nnot json")
            .expect_err("decode");
        match err {
            TransportError::Decode(msg) => assert!(msg.starts_with("line 2")),
            other => panic!("unexpected error type: {other}"),
        }
    }

    #[test]
    fn jsonl_roundtrip_keeps_entries() {
        let transport = ReplayTransport::from_jsonl(FIXTURE).expect("load");
        let restored =
            ReplayTransport::from_jsonl(&transport.to_jsonl().expect("encode")).expect("decode");
        assert_eq!(restored.entries, transport.entries);
    }
}
