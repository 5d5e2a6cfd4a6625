//! View-model rendering — generative-UI cards and stream lines as
//! styled ratatui text.
//!
//! Pure functions from view models to `Text`; no app state, no side
//! effects, safe to call every frame.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use serde_json::Value;

use crate::api::types::Event;
use crate::genui::payload;
use crate::genui::{ActionView, UiCard};

use super::format::{badge_for, format_clock, truncate, Badge};

fn title_span<'a>(title: String) -> Span<'a> {
    Span::styled(title, Style::default().add_modifier(Modifier::BOLD))
}

/// Render a classified directive as terminal text.
pub fn card_text<'a>(card: &UiCard) -> Text<'a> {
    match card {
        UiCard::Table {
            title,
            columns,
            rows,
        } => {
            let mut lines = vec![Line::from(title_span(title.clone()))];
            lines.push(Line::from(Span::styled(
                columns.join(" | "),
                Style::default().fg(Color::Cyan),
            )));
            for row in rows {
                lines.push(Line::from(row.join(" | ")));
            }
            Text::from(lines)
        }
        UiCard::Approval { title, summary } => Text::from(vec![
            Line::from(title_span(title.clone())),
            Line::from(Span::styled(
                summary.clone(),
                Style::default().fg(Color::Yellow),
            )),
        ]),
        UiCard::FlightCard {
            from,
            to,
            date,
            price,
        } => Text::from(vec![
            Line::from(title_span("Flight".into())),
            Line::from(format!("{from} → {to}")),
            Line::from(format!("Date: {date}")),
            Line::from(format!("Price: {price}")),
            Line::from(Span::styled("[Select]", Style::default().fg(Color::Cyan))),
        ]),
        UiCard::DatePicker => Text::from(vec![
            Line::from(title_span("Date Picker".into())),
            Line::from(vec![
                Span::raw("[____-__-__] "),
                Span::styled("[Apply]", Style::default().fg(Color::Cyan)),
            ]),
        ]),
        UiCard::Raw(value) => {
            let dump = serde_json::to_string_pretty(value).unwrap_or_default();
            Text::from(
                dump.lines()
                    .map(|l| Line::from(l.to_string()))
                    .collect::<Vec<_>>(),
            )
        }
    }
}

/// Render directive-level action controls as one line of buttons.
pub fn actions_line<'a>(actions: &[ActionView]) -> Line<'a> {
    let mut spans = Vec::new();
    for action in actions {
        let style = if action.primary {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!("[{}]", action.label), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn badge_color(badge: Badge) -> Color {
    match badge {
        Badge::Danger => Color::Red,
        Badge::Warn => Color::Yellow,
        Badge::Success => Color::Green,
        Badge::Default => Color::DarkGray,
    }
}

/// One stream line: badge, summary, clock.
pub fn event_line<'a>(event: &Event) -> Line<'a> {
    let badge = badge_for(&event.event_type);
    let summary = payload::summary(event);
    let summary = if summary.is_empty() {
        "event".to_string()
    } else {
        summary
    };
    Line::from(vec![
        Span::styled(
            format!("[{}] ", event.event_type),
            Style::default().fg(badge_color(badge)),
        ),
        Span::raw(truncate(&summary, 80)),
        Span::styled(
            format!("  {}", format_clock(event.timestamp)),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Raw JSON dump of an event payload for the workspace panes.
pub fn event_dump<'a>(event: &Event) -> Text<'a> {
    let mut lines = vec![Line::from(Span::styled(
        event.event_type.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let dump = serde_json::to_string_pretty(&event.payload).unwrap_or_default();
    lines.extend(dump.lines().map(|l| Line::from(l.to_string())));
    Text::from(lines)
}

/// Textual adjacency summary of the agent graph (no canvas in a TUI).
pub fn graph_lines<'a>(graph: &crate::api::types::GraphData) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for node in &graph.nodes {
        let label = node.label.clone().unwrap_or_else(|| node.id.clone());
        let kind = node.kind.clone().unwrap_or_else(|| "agent".into());
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Cyan)),
            Span::styled(format!(" ({kind})"), Style::default().fg(Color::DarkGray)),
        ]));
    }
    for edge in &graph.edges {
        let count = edge.count.map(|c| format!(" x{c}")).unwrap_or_default();
        lines.push(Line::from(format!(
            "  {} → {}{count}",
            edge.source, edge.target
        )));
    }
    lines
}

/// A metrics object as aligned key/value lines.
pub fn metric_lines<'a>(metrics: &serde_json::Map<String, Value>) -> Vec<Line<'a>> {
    metrics
        .iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{key}: "), Style::default().fg(Color::Cyan)),
                Span::raw(match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten(text: &Text) -> String {
        text.lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn table_card_renders_header_and_rows() {
        let card = UiCard::Table {
            title: "Flights".into(),
            columns: vec!["route".into(), "price".into()],
            rows: vec![vec!["NRT-SFO".into(), "820".into()]],
        };
        let out = flatten(&card_text(&card));
        assert!(out.contains("Flights"));
        assert!(out.contains("route | price"));
        assert!(out.contains("NRT-SFO | 820"));
    }

    #[test]
    fn header_only_table_has_no_data_rows() {
        let card = UiCard::Table {
            title: "T".into(),
            columns: vec!["a".into()],
            rows: vec![],
        };
        assert_eq!(card_text(&card).lines.len(), 2);
    }

    #[test]
    fn flight_card_shows_placeholders() {
        let card = UiCard::FlightCard {
            from: "NRT".into(),
            to: "SFO".into(),
            date: "TBD".into(),
            price: "—".into(),
        };
        let out = flatten(&card_text(&card));
        assert!(out.contains("NRT → SFO"));
        assert!(out.contains("Date: TBD"));
        assert!(out.contains("Price: —"));
        assert!(out.contains("[Select]"));
    }

    #[test]
    fn raw_card_dumps_json() {
        let card = UiCard::Raw(json!({"type": "hologram", "x": 1}));
        let out = flatten(&card_text(&card));
        assert!(out.contains("hologram"));
    }

    #[test]
    fn actions_line_labels() {
        let actions = vec![
            ActionView {
                label: "Book".into(),
                primary: true,
                action: json!({}),
            },
            ActionView {
                label: "Action 2".into(),
                primary: false,
                action: json!({}),
            },
        ];
        let line = actions_line(&actions);
        let out = line.to_string();
        assert!(out.contains("[Book]"));
        assert!(out.contains("[Action 2]"));
    }

    #[test]
    fn event_line_includes_badge_and_summary() {
        let event = Event {
            event_type: "tool_call".into(),
            timestamp: 1_609_459_230,
            payload: json!({"message": "ran grep"}),
        };
        let out = event_line(&event).to_string();
        assert!(out.contains("[tool_call]"));
        assert!(out.contains("ran grep"));
        assert!(out.contains("00:00:30"));
    }

    #[test]
    fn graph_lines_cover_nodes_and_edges() {
        let graph: crate::api::types::GraphData = serde_json::from_value(json!({
            "nodes": [{"id": "planner"}, {"id": "executor", "label": "Exec"}],
            "edges": [{"source": "planner", "target": "executor", "count": 3}]
        }))
        .unwrap();
        let lines = graph_lines(&graph);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].to_string().contains("planner → executor x3"));
    }
}
