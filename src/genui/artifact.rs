//! Artifact extraction — fenced renderable blocks in the event stream.
//!
//! The agent emits renderable HTML/SVG wrapped in fenced code blocks.
//! Scanning is first-match-wins over the event list (most-recent-first),
//! so there is at most one active artifact at a time. Pure — safe to
//! recompute every poll cycle.

use std::sync::LazyLock;

use regex::Regex;

use crate::api::types::Event;

use super::payload::{normalize, payload_text};

static FENCED_ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```(html|svg)(.*?)```").unwrap());

/// What kind of renderable content an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Html,
    Svg,
}

impl ArtifactKind {
    /// The fence tag, lowercased.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Html => "html",
            ArtifactKind::Svg => "svg",
        }
    }
}

/// A renderable artifact recovered from an event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Fence contents, trimmed.
    pub content: String,
}

/// Scan the event list (most-recent-first) for the first fenced html
/// or svg block. Stops at the first match.
pub fn extract_artifact(events: &[Event]) -> Option<Artifact> {
    for event in events {
        let payload = normalize(event);
        let text = payload_text(&payload);
        if let Some(caps) = FENCED_ARTIFACT.captures(&text) {
            let kind = match caps[1].to_ascii_lowercase().as_str() {
                "svg" => ArtifactKind::Svg,
                _ => ArtifactKind::Html,
            };
            return Some(Artifact {
                kind,
                content: caps[2].trim().to_string(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(payload: serde_json::Value) -> Event {
        Event {
            event_type: "agent_output".into(),
            timestamp: 0,
            payload,
        }
    }

    #[test]
    fn first_match_wins() {
        let events = vec![
            event(json!("no block here")),
            event(json!("```html\nA\n```")),
            event(json!("```html\nB\n```")),
        ];
        let artifact = extract_artifact(&events).unwrap();
        assert_eq!(artifact.content, "A");
    }

    #[test]
    fn content_is_trimmed() {
        let events = vec![event(json!("```html\n  <p>x</p>  \n```"))];
        let artifact = extract_artifact(&events).unwrap();
        assert_eq!(artifact.content, "<p>x</p>");
    }

    #[test]
    fn tag_is_case_insensitive() {
        let events = vec![event(json!("```SVG\n<svg/>\n```"))];
        let artifact = extract_artifact(&events).unwrap();
        assert_eq!(artifact.kind, ArtifactKind::Svg);
    }

    #[test]
    fn scans_serialized_object_payloads() {
        let events = vec![event(json!({"payload": {"text": "```html<b>hi</b>```"}}))];
        let artifact = extract_artifact(&events).unwrap();
        assert_eq!(artifact.kind, ArtifactKind::Html);
        assert_eq!(artifact.content, "<b>hi</b>");
    }

    #[test]
    fn no_match_returns_none() {
        let events = vec![event(json!("plain")), event(json!({"message": "hi"}))];
        assert!(extract_artifact(&events).is_none());
    }

    #[test]
    fn idempotent() {
        let events = vec![event(json!("```html\nX\n```"))];
        assert_eq!(extract_artifact(&events), extract_artifact(&events));
    }
}
