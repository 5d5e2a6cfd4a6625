//! Wire types for the control-plane API.
//!
//! Every shape here is defensive: the backend's payloads are loosely
//! structured and evolve ahead of this client, so unknown or missing
//! fields must never fail deserialization. Free-form regions are carried
//! as `serde_json::Value` and interpreted downstream (see `genui`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event from the backend's event stream.
///
/// `payload` has no fixed shape: a raw string, an object, or an object
/// wrapping another object under a nested `payload` key. Interpretation
/// lives in `genui::payload`, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub event_type: String,
    /// Unix seconds; 0 when the backend omits it. Accepts any JSON
    /// number on the wire (fractional seconds truncate).
    #[serde(default, deserialize_with = "timestamp_secs")]
    pub timestamp: u64,
    #[serde(default)]
    pub payload: Value,
}

fn timestamp_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64).unwrap_or(0))
}

/// Decode events one at a time, dropping entries that fail. A single
/// malformed event must cost one event, never the whole snapshot.
fn lenient_events<'de, D>(deserializer: D) -> Result<Vec<Event>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

/// Response from `GET /api/cockpit`: events, agent-to-agent traffic, metrics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CockpitSnapshot {
    #[serde(default, deserialize_with = "lenient_events")]
    pub events: Vec<Event>,
    #[serde(default)]
    pub a2a: Vec<Value>,
    #[serde(default)]
    pub metrics: serde_json::Map<String, Value>,
}

/// A registered tool from `GET /api/tools`.
#[derive(Debug, Clone, Deserialize)]
pub struct Tool {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arg_hint: Option<String>,
    #[serde(default)]
    pub risk: Option<String>,
}

/// An indexed retrieval source from `GET /api/rag_sources`.
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub chunks: Option<u64>,
    #[serde(default)]
    pub avg_rank: Option<f64>,
}

/// An agent persona from `GET /api/roles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl Persona {
    /// Display label, falling back to the id.
    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// A node in the agent relationship graph.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// An edge in the agent relationship graph.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphEdge {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Response from `GET /api/graph`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// An unapproved run from `GET /api/pending_runs`.
///
/// `intent` is a string or an object carrying `command`/`goal`;
/// `plan_steps` entries are objects or bare strings. Both are projected
/// into display form by `governance`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingRun {
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub intent: Value,
    #[serde(default)]
    pub plan_steps: Vec<Value>,
}

/// One entry from `GET /api/runs`, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct RunHistoryEntry {
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub updated_at: Option<u64>,
}

/// One hit from `POST /api/memory_search`.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryResult {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Response from `POST /api/command`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Response from `GET /api/log_tail`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogTail {
    #[serde(default)]
    pub lines: Vec<String>,
}

/// Response from `GET /api/vla_latest` — a data URI or URL, when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisionFrame {
    #[serde(default)]
    pub image: Option<String>,
}

/// Response from `GET /api/run_diff`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunDiffResponse {
    #[serde(default)]
    pub diff: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_tolerates_missing_fields() {
        let e: Event = serde_json::from_str("{}").unwrap();
        assert_eq!(e.event_type, "");
        assert_eq!(e.timestamp, 0);
        assert!(e.payload.is_null());
    }

    #[test]
    fn event_accepts_string_payload() {
        let e: Event =
            serde_json::from_str(r#"{"event_type":"log","payload":"plain text"}"#).unwrap();
        assert_eq!(e.payload.as_str(), Some("plain text"));
    }

    #[test]
    fn cockpit_snapshot_defaults() {
        let s: CockpitSnapshot = serde_json::from_str("{}").unwrap();
        assert!(s.events.is_empty());
        assert!(s.metrics.is_empty());
    }

    #[test]
    fn event_accepts_fractional_timestamp() {
        let e: Event =
            serde_json::from_str(r#"{"event_type":"log","timestamp":1712345678.25}"#).unwrap();
        assert_eq!(e.timestamp, 1_712_345_678);
    }

    #[test]
    fn event_tolerates_junk_timestamp() {
        let e: Event = serde_json::from_str(r#"{"timestamp":"soon"}"#).unwrap();
        assert_eq!(e.timestamp, 0);
        let e: Event = serde_json::from_str(r#"{"timestamp":-5}"#).unwrap();
        assert_eq!(e.timestamp, 0);
    }

    #[test]
    fn snapshot_keeps_good_events_alongside_fractional_timestamps() {
        let s: CockpitSnapshot = serde_json::from_str(
            r#"{"events":[
                {"event_type":"a","timestamp":10},
                {"event_type":"b","timestamp":1712345678.25}
            ]}"#,
        )
        .unwrap();
        assert_eq!(s.events.len(), 2);
        assert_eq!(s.events[1].timestamp, 1_712_345_678);
    }

    #[test]
    fn snapshot_drops_only_the_malformed_event() {
        let s: CockpitSnapshot = serde_json::from_str(
            r#"{"events":[
                {"event_type":"good","timestamp":1},
                {"event_type":42},
                "not an event"
            ]}"#,
        )
        .unwrap();
        assert_eq!(s.events.len(), 1);
        assert_eq!(s.events[0].event_type, "good");
    }

    #[test]
    fn pending_run_with_object_intent() {
        let r: PendingRun = serde_json::from_str(
            r#"{"run_id":"r1","intent":{"goal":"ship it"},"plan_steps":["a","b"]}"#,
        )
        .unwrap();
        assert_eq!(r.run_id, "r1");
        assert_eq!(r.plan_steps.len(), 2);
    }

    #[test]
    fn persona_display_falls_back_to_id() {
        let p = Persona {
            id: "Coder".into(),
            label: None,
        };
        assert_eq!(p.display(), "Coder");
    }
}
