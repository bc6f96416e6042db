//! Event-stream decoding for streaming subscriptions
//!
//! A streaming `GET` with `Accept: text/event-stream` answers with
//! server-sent events. Each event has a name and a JSON payload:
//!
//! ```text
//! event: put
//! data: {"path": "/", "data": {"2024": {"-Nq...": {"name": "A"}}}}
//!
//! event: patch
//! data: {"path": "/2024", "data": {"-Nr...": {"name": "B"}}}
//!
//! event: keep-alive
//! data: null
//! ```
//!
//! `put` replaces the node at `path` (relative to the subscribed path),
//! `patch` replaces each listed child of it. `cancel` and `auth_revoked` end
//! the stream.

use crate::adapters::store::tree;
use crate::domain::StoreError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One raw server-sent event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerEvent {
    pub event: String,
    pub data: String,
}

/// Incremental parser for a `text/event-stream` body
///
/// Chunks may split lines and even UTF-8 sequences; bytes are buffered until
/// a full line is available.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    buffer: Vec<u8>,
    event: String,
    data: Vec<String>,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of the body, returning every event it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ServerEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<ServerEvent> {
        if line.is_empty() {
            if self.event.is_empty() && self.data.is_empty() {
                return None;
            }
            let event = ServerEvent {
                event: std::mem::take(&mut self.event),
                data: std::mem::take(&mut self.data).join("\n"),
            };
            return Some(event);
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = value.to_string(),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }
}

/// Decoded subscription update
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    /// Replace the node at `path`
    Put { path: Vec<String>, data: Value },
    /// Replace each child of the node at `path` listed in `data`
    Patch { path: Vec<String>, data: Map<String, Value> },
    /// Heartbeat, nothing to apply
    KeepAlive,
    /// The server cancelled the listener (typically a rules denial)
    Cancel(String),
    /// The credential used for the stream is no longer valid
    AuthRevoked(String),
}

#[derive(Deserialize)]
struct Payload {
    path: String,
    data: Value,
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl StreamUpdate {
    /// Decode a raw event. Unknown event names are treated as heartbeats.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidResponse` if a `put` or `patch` payload is
    /// not the expected JSON.
    pub fn decode(event: &ServerEvent) -> Result<Self, StoreError> {
        match event.event.as_str() {
            "put" => {
                let payload = parse_payload(event)?;
                Ok(StreamUpdate::Put {
                    path: split_path(&payload.path),
                    data: payload.data,
                })
            }
            "patch" => {
                let payload = parse_payload(event)?;
                let Value::Object(data) = payload.data else {
                    return Err(StoreError::InvalidResponse(
                        "patch event data must be an object".to_string(),
                    ));
                };
                Ok(StreamUpdate::Patch {
                    path: split_path(&payload.path),
                    data,
                })
            }
            "cancel" => Ok(StreamUpdate::Cancel(reason_from(&event.data))),
            "auth_revoked" => Ok(StreamUpdate::AuthRevoked(reason_from(&event.data))),
            other => {
                if other != "keep-alive" {
                    tracing::debug!(event = other, "Ignoring unknown stream event");
                }
                Ok(StreamUpdate::KeepAlive)
            }
        }
    }

    /// Apply the update to the locally mirrored value.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the mirrored value may have changed, `Ok(false)` for
    /// heartbeats.
    ///
    /// # Errors
    ///
    /// `Cancel` and `AuthRevoked` are turned into `PermissionDenied`.
    pub fn apply(self, mirror: &mut Value) -> Result<bool, StoreError> {
        match self {
            StreamUpdate::Put { path, data } => {
                tree::write_at(mirror, &path, data);
                Ok(true)
            }
            StreamUpdate::Patch { path, data } => {
                for (key, value) in data {
                    let mut child = path.clone();
                    child.extend(split_path(&key));
                    tree::write_at(mirror, &child, value);
                }
                Ok(true)
            }
            StreamUpdate::KeepAlive => Ok(false),
            StreamUpdate::Cancel(reason) => Err(StoreError::PermissionDenied(format!(
                "listener cancelled by server: {reason}"
            ))),
            StreamUpdate::AuthRevoked(reason) => Err(StoreError::PermissionDenied(format!(
                "credential revoked: {reason}"
            ))),
        }
    }
}

fn parse_payload(event: &ServerEvent) -> Result<Payload, StoreError> {
    serde_json::from_str(&event.data).map_err(|e| {
        StoreError::InvalidResponse(format!("malformed {} event: {e}", event.event))
    })
}

fn reason_from(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(s)) => s,
        Ok(Value::Null) | Err(_) if data.trim().is_empty() || data.trim() == "null" => {
            "no reason given".to_string()
        }
        _ => data.to_string(),
    }
}
