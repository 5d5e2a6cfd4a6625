//! Display formatting helpers for the dashboard panes.

/// Visual class of an event line, from its event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Danger,
    Warn,
    Success,
    Default,
}

/// Classify an event type for badge coloring.
pub fn badge_for(event_type: &str) -> Badge {
    if event_type.contains("error") || event_type.contains("fail") {
        Badge::Danger
    } else if event_type.contains("plan") || event_type.contains("intent") {
        Badge::Warn
    } else if event_type.contains("tool") || event_type.contains("action") {
        Badge::Success
    } else {
        Badge::Default
    }
}

/// Format a unix-seconds timestamp as `HH:MM:SS` (UTC). Zero (the
/// backend's "absent" value) renders as an em-dash placeholder.
pub fn format_clock(ts: u64) -> String {
    if ts == 0 {
        return "—".into();
    }
    let secs = ts % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Truncate for single-line display, marking the cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

/// Render an optional relevance score to two decimals.
pub fn format_score(score: Option<f64>) -> String {
    format!("{:.2}", score.unwrap_or(0.0))
}

/// Short run id for tight columns (first 8 chars, like the web UI).
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
