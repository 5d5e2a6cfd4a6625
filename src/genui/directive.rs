//! UI directive extraction — layered recovery of structured UI hints.
//!
//! Directives arrive two ways, tried in order:
//!
//! 1. A fenced ```ui block (preferred, unambiguous). If a fence is
//!    present, it decides the outcome: malformed contents yield nothing
//!    and the inline tier is not consulted.
//! 2. An inline `"ui": { ... }` fragment inside a larger serialized
//!    message (legacy, best-effort). The captured region is greedy to
//!    the last closing brace in the text.
//!
//! Both tiers are total: parse failure yields `None`, never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::api::types::Event;

use super::payload::{normalize, payload_text};

/// Event type the backend uses for already-structured UI blocks.
pub const UI_BLOCK_EVENT: &str = "ui_block";

static FENCED_UI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```ui(.*?)```").unwrap());
static INLINE_UI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)"ui"\s*:\s*(\{.*\})"#).unwrap());

/// Extract a UI directive from one normalized payload.
pub fn extract_directive(payload: &Value) -> Option<Value> {
    let text = payload_text(payload);

    if let Some(caps) = FENCED_UI.captures(&text) {
        return serde_json::from_str(&caps[1]).ok();
    }

    let caps = INLINE_UI.captures(&text)?;
    serde_json::from_str(&caps[1]).ok()
}

/// A structured UI block lifted from the event stream.
///
/// `id` is stable only within one poll's event list (event type +
/// position); ephemeral form state keyed by it is best-effort across
/// polls.
#[derive(Debug, Clone)]
pub struct UiBlock {
    pub id: String,
    pub ui: Value,
    pub timestamp: u64,
}

/// Collect every `ui_block` event carrying a structured `ui` object.
///
/// Unlike artifact extraction this accumulates all matches, in event
/// order. No text parsing — the payload is already structured.
pub fn extract_ui_blocks(events: &[Event]) -> Vec<UiBlock> {
    let mut blocks = Vec::new();
    for (idx, event) in events.iter().enumerate() {
        if event.event_type != UI_BLOCK_EVENT {
            continue;
        }
        let payload = normalize(event);
        if let Some(ui) = payload.get("ui").filter(|ui| ui.is_object()) {
            blocks.push(UiBlock {
                id: format!("{}-{idx}", event.event_type),
                ui: ui.clone(),
                timestamp: event.timestamp,
            });
        }
    }
    blocks
}
