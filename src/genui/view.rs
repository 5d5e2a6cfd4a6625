//! Directive classification — maps parsed UI directives to view models.
//!
//! A pure, total mapping: the same directive always yields the same
//! view model, malformed fields degrade to documented defaults, and
//! unknown types fall back to a raw dump for operator visibility.
//! Re-running every poll tick is cheap and safe by construction.

use serde_json::Value;

/// Typed view model for a recognized UI directive.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCard {
    /// Header row + data rows. Missing/non-array fields become empty.
    Table {
        title: String,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Title + summary; approve/deny controls are supplied by callers.
    Approval { title: String, summary: String },
    /// Route, date, price, and a single selection control.
    FlightCard {
        from: String,
        to: String,
        date: String,
        price: String,
    },
    /// Date input + apply control; carries no directive-supplied state.
    DatePicker,
    /// Fallback: raw structured dump (includes `form`, which the
    /// approval workflow renders itself).
    Raw(Value),
}

/// Classify a directive by its `type` tag. Total — never fails.
pub fn classify(ui: &Value) -> UiCard {
    match ui.get("type").and_then(Value::as_str) {
        Some("table") => UiCard::Table {
            title: str_or(ui, "title", "Table"),
            columns: string_list(ui.get("columns")),
            rows: ui
                .get("rows")
                .and_then(Value::as_array)
                .map(|rows| rows.iter().map(|row| string_list(Some(row))).collect())
                .unwrap_or_default(),
        },
        Some("approval") => UiCard::Approval {
            title: str_or(ui, "title", "Approval"),
            summary: str_or(ui, "summary", "Action requires approval."),
        },
        Some("flight_card") => UiCard::FlightCard {
            from: str_or(ui, "from", ""),
            to: str_or(ui, "to", ""),
            date: str_or(ui, "date", "TBD"),
            price: str_or(ui, "price", "—"),
        },
        Some("date_picker") => UiCard::DatePicker,
        _ => UiCard::Raw(ui.clone()),
    }
}

/// A control derived from a directive-level action entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionView {
    pub label: String,
    pub primary: bool,
    /// The original action object, forwarded opaquely on activation.
    pub action: Value,
}

/// Build one control per `actions` entry. Label falls back to the
/// action's `type`, then to an ordinal placeholder.
pub fn action_views(ui: &Value) -> Vec<ActionView> {
    let Some(actions) = ui.get("actions").and_then(Value::as_array) else {
        return Vec::new();
    };
    actions
        .iter()
        .enumerate()
        .map(|(idx, action)| {
            let label = action
                .get("label")
                .and_then(Value::as_str)
                .or_else(|| action.get("type").and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Action {}", idx + 1));
            ActionView {
                label,
                primary: action
                    .get("primary")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                action: action.clone(),
            }
        })
        .collect()
}

fn str_or(ui: &Value, key: &str, default: &str) -> String {
    match ui.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => display_value(other),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(display_value).collect())
        .unwrap_or_default()
}

/// Cell-level display coercion: strings verbatim, other scalars and
/// structures as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
