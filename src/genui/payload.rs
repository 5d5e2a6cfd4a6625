//! Payload normalization — unwraps the event envelope before extraction.
//!
//! Backend events idiomatically nest their real payload one level deep
//! (`event.payload.payload`). Normalization resolves exactly that one
//! level; deeper nesting passes through untouched and downstream
//! extractors tolerate whatever remains.

use serde_json::Value;

use crate::api::types::Event;

/// Produce the normalized payload for an event.
///
/// If `payload.payload` exists and is non-null, that wins; otherwise the
/// payload itself. A null inner payload counts as absent. An absent
/// payload normalizes to an empty object. Never fails.
pub fn normalize(event: &Event) -> Value {
    match &event.payload {
        Value::Object(map) => map
            .get("payload")
            .filter(|inner| !inner.is_null())
            .cloned()
            .unwrap_or_else(|| event.payload.clone()),
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other.clone(),
    }
}

/// Coerce a payload value to text for the fenced-block scanners.
///
/// Strings pass through; everything else serializes to compact JSON.
pub fn payload_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// One-line human summary of an event, for the stream panes.
///
/// Preference order: raw string payload, `message`, `intent`, `ui.title`.
pub fn summary(event: &Event) -> String {
    let payload = normalize(event);
    if let Value::String(s) = &payload {
        return s.clone();
    }
    for key in ["message", "intent"] {
        if let Some(text) = payload.get(key).and_then(Value::as_str) {
            return text.to_string();
        }
    }
    payload
        .get("ui")
        .and_then(|ui| ui.get("title"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(payload: Value) -> Event {
        Event {
            event_type: "test".into(),
            timestamp: 0,
            payload,
        }
    }

    #[test]
    fn normalize_unwraps_one_level() {
        let e = event(json!({"payload": {"message": "inner"}}));
        assert_eq!(normalize(&e), json!({"message": "inner"}));
    }

    #[test]
    fn normalize_does_not_recurse() {
        let e = event(json!({"payload": {"payload": {"message": "deep"}}}));
        // One level only — the second wrapper survives.
        assert_eq!(normalize(&e), json!({"payload": {"message": "deep"}}));
    }

    #[test]
    fn normalize_absent_payload_is_empty_object() {
        let e = event(Value::Null);
        assert_eq!(normalize(&e), json!({}));
    }

    #[test]
    fn normalize_null_inner_payload_keeps_outer() {
        let e = event(json!({"payload": null, "message": "m"}));
        assert_eq!(normalize(&e), json!({"payload": null, "message": "m"}));
        // Downstream text coercion must never see a bare null.
        assert_ne!(payload_text(&normalize(&e)), "null");
    }

    #[test]
    fn normalize_passes_strings_through() {
        let e = event(json!("raw text"));
        assert_eq!(normalize(&e), json!("raw text"));
    }

    #[test]
    fn payload_text_serializes_objects() {
        assert_eq!(payload_text(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(payload_text(&json!("hi")), "hi");
    }

    #[test]
    fn summary_prefers_string_payload() {
        let e = event(json!({"payload": "did the thing"}));
        assert_eq!(summary(&e), "did the thing");
    }

    #[test]
    fn summary_falls_back_through_keys() {
        assert_eq!(summary(&event(json!({"message": "m"}))), "m");
        assert_eq!(summary(&event(json!({"intent": "i"}))), "i");
        assert_eq!(summary(&event(json!({"ui": {"title": "t"}}))), "t");
        assert_eq!(summary(&event(json!({"other": true}))), "");
    }
}
