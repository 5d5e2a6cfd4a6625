//! Run governance — pending-approval and run-comparison projections.
//!
//! Derives display form from polled run data: intent text from its two
//! wire shapes, plan-step lines, clarification form fields, run-diff
//! state, and the first-time defaulting of the comparison selectors.

use serde_json::Value;

use crate::api::types::{PendingRun, RunHistoryEntry};

/// Max plan steps shown on an approval card.
const APPROVAL_STEP_LIMIT: usize = 5;

/// Human text for a pending run's intent.
///
/// String intents pass through; object intents prefer `command`, then
/// `goal`. Anything else reads "Pending run".
pub fn intent_text(run: &PendingRun) -> String {
    match &run.intent {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("command")
            .or_else(|| map.get("goal"))
            .and_then(Value::as_str)
            .unwrap_or("Pending run")
            .to_string(),
        _ => "Pending run".to_string(),
    }
}

/// Display lines for a run's plan steps, capped for the approval card.
///
/// Object steps render as `"{step}. {action} → {target}"` with
/// positional and field fallbacks; bare string steps pass through.
pub fn step_lines(run: &PendingRun) -> Vec<String> {
    run.plan_steps
        .iter()
        .take(APPROVAL_STEP_LIMIT)
        .enumerate()
        .map(|(idx, step)| match step {
            Value::String(s) => s.clone(),
            Value::Object(map) => {
                let number = map
                    .get("step")
                    .map(display_scalar)
                    .unwrap_or_else(|| (idx + 1).to_string());
                let action = map
                    .get("action")
                    .and_then(Value::as_str)
                    .unwrap_or("step");
                let target = map
                    .get("target")
                    .or_else(|| map.get("command"))
                    .and_then(Value::as_str)
                    .unwrap_or("—");
                format!("{number}. {action} → {target}")
            }
            other => other.to_string(),
        })
        .collect()
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A labeled input of a clarification form directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Key the entered value is stored and submitted under.
    pub key: String,
    /// Label shown next to the input.
    pub label: String,
}

/// Resolve a form directive's `fields` into key/label pairs.
///
/// Each entry is a bare string (key and label alike) or an object whose
/// key resolves key → name → label and whose label resolves
/// label → name → key, with ordinal placeholders when all are absent.
pub fn form_fields(ui: &Value) -> Vec<FormField> {
    let Some(fields) = ui.get("fields").and_then(Value::as_array) else {
        return Vec::new();
    };
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| match field {
            Value::String(s) => FormField {
                key: s.clone(),
                label: s.clone(),
            },
            _ => {
                let pick = |keys: [&str; 3]| {
                    keys.iter()
                        .find_map(|k| field.get(*k).and_then(Value::as_str))
                        .map(str::to_string)
                };
                FormField {
                    key: pick(["key", "name", "label"])
                        .unwrap_or_else(|| format!("field_{}", idx + 1)),
                    label: pick(["label", "name", "key"])
                        .unwrap_or_else(|| format!("Field {}", idx + 1)),
                }
            }
        })
        .collect()
}

/// State of the run-diff panel. `Failed` is displayable and distinct
/// from "no data yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RunDiff {
    #[default]
    Idle,
    Loading,
    Ready(String),
    Failed(String),
}

/// Default the comparison selectors the first time history is non-empty:
/// A ← newest, B ← second-newest (both ← newest when only one run).
/// A selector the user already set is never touched.
pub fn default_run_selection(
    runs: &[RunHistoryEntry],
    run_a: &mut Option<String>,
    run_b: &mut Option<String>,
) {
    let Some(newest) = runs.first() else { return };
    if run_a.is_none() {
        *run_a = Some(newest.run_id.clone());
    }
    if run_b.is_none() {
        let second = runs.get(1).unwrap_or(newest);
        *run_b = Some(second.run_id.clone());
    }
}
