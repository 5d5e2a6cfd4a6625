//! Tabbed dashboard layout.
//!
//! ```text
//! ┌─[F1 Mission]──[F2 Coder]── ... ──[F7 Health]────┐
//! │                                                  │
//! │  (panels for the active tab)                     │
//! │                                                  │
//! ├──────────────────────────────────────────────────┤
//! │ > command bar                                    │
//! ├──────────────────────────────────────────────────┤
//! │ [persona] [events: N] [pending: N] status        │
//! └──────────────────────────────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::genui::{action_views, classify, extract_directive, payload};
use crate::governance::{form_fields, intent_text, step_lines, RunDiff};

use super::app::{DashboardApp, InputMode, Tab};
use super::format::{format_clock, short_id, truncate};
use super::render;

/// Draw the full dashboard.
pub fn draw(f: &mut Frame, app: &DashboardApp) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Min(5),    // content
            Constraint::Length(3), // command bar
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    draw_tab_bar(f, app, outer[0]);

    match app.active_tab {
        Tab::Mission => draw_mission(f, app, outer[1]),
        Tab::Coder => draw_coder(f, app, outer[1]),
        Tab::Research => draw_research(f, app, outer[1]),
        Tab::Vla => draw_vla(f, app, outer[1]),
        Tab::Brain => draw_brain(f, app, outer[1]),
        Tab::Governance => draw_governance(f, app, outer[1]),
        Tab::Health => draw_health(f, app, outer[1]),
    }

    draw_command_bar(f, app, outer[2]);
    draw_status(f, app, outer[3]);

    if app.config_editor_open {
        draw_config_sheet(f, app);
    }
}

fn draw_tab_bar(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let spans: Vec<Span> = Tab::ALL
        .iter()
        .enumerate()
        .flat_map(|(idx, tab)| {
            let style = if *tab == app.active_tab {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![
                Span::raw(" "),
                Span::styled(format!("[F{} {}]", idx + 1, tab.label()), style),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn panel<'a>(title: &'a str) -> Block<'a> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Execution stream with inline generative-UI cards, shared by several tabs.
fn stream_text<'a>(app: &DashboardApp, limit: usize) -> Text<'a> {
    let mut lines = Vec::new();
    for event in app.events.iter().take(limit) {
        lines.push(render::event_line(event));
        let normalized = payload::normalize(event);
        if let Some(ui) = extract_directive(&normalized) {
            let card = classify(&ui);
            lines.extend(render::card_text(&card).lines);
            let actions = action_views(&ui);
            if !actions.is_empty() {
                lines.push(render::actions_line(&actions));
            }
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No events yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    Text::from(lines)
}

fn draw_mission(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22),
            Constraint::Percentage(46),
            Constraint::Percentage(32),
        ])
        .split(area);

    // Sidebar: personas + pending approvals
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(cols[0]);

    let persona_lines: Vec<Line> = app
        .personas
        .iter()
        .map(|p| {
            let active = app.persona.as_deref() == Some(p.id.as_str());
            let style = if active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(p.display().to_string(), style))
        })
        .collect();
    f.render_widget(
        Paragraph::new(persona_lines).block(panel("Agent Market (^P)")),
        side[0],
    );

    let mut pending_lines = Vec::new();
    for run in &app.pending_runs {
        pending_lines.push(Line::from(vec![
            Span::styled(
                truncate(&intent_text(run), 28),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", short_id(&run.run_id)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    if pending_lines.is_empty() {
        pending_lines.push(Line::from("None"));
    }
    f.render_widget(
        Paragraph::new(pending_lines).block(panel("Pending Approvals (^A)")),
        side[1],
    );

    // Center: unified flow — plan + execution stream
    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(cols[1]);

    let plan_text = if let Some(run) = app.pending_runs.first() {
        let mut lines = vec![Line::from(Span::styled(
            format!("Run: {}", run.run_id),
            Style::default().fg(Color::Cyan),
        ))];
        lines.extend(step_lines(run).into_iter().map(Line::from));
        Text::from(lines)
    } else if app.plan.is_empty() {
        Text::from("No active plan yet.")
    } else {
        Text::from(
            app.plan
                .lines()
                .map(|l| Line::from(l.to_string()))
                .collect::<Vec<_>>(),
        )
    };
    f.render_widget(
        Paragraph::new(plan_text).wrap(Wrap { trim: false }).block(panel("Plan")),
        center[0],
    );
    f.render_widget(
        Paragraph::new(stream_text(app, 8)).block(panel("Execution")),
        center[1],
    );

    // Right: artifact + run history + diff
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(cols[2]);

    let artifact_text = match &app.artifact {
        Some(artifact) => {
            let mut lines = vec![Line::from(Span::styled(
                format!("kind: {}", artifact.kind.as_str()),
                Style::default().fg(Color::Cyan),
            ))];
            lines.extend(artifact.content.lines().map(|l| Line::from(l.to_string())));
            Text::from(lines)
        }
        None => Text::from("No artifacts yet."),
    };
    f.render_widget(
        Paragraph::new(artifact_text)
            .wrap(Wrap { trim: false })
            .block(panel("Artifacts")),
        right[0],
    );

    let history_lines: Vec<Line> = if app.run_history.is_empty() {
        vec![Line::from("No runs yet.")]
    } else {
        app.run_history
            .iter()
            .map(|run| {
                Line::from(vec![
                    Span::styled(
                        short_id(&run.run_id),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!(
                        " {} ",
                        truncate(run.goal.as_deref().unwrap_or("Untitled run"), 24)
                    )),
                    Span::styled(
                        format!(
                            "{} {}",
                            run.status.as_deref().unwrap_or("unknown"),
                            run.updated_at.map(format_clock).unwrap_or_else(|| "—".into())
                        ),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };
    f.render_widget(
        Paragraph::new(history_lines).block(panel("Run History (^J/^K select)")),
        right[1],
    );

    let diff_title = format!(
        "Run Diff (^D) A:{} B:{}",
        app.run_a.as_deref().map(short_id).unwrap_or_else(|| "—".into()),
        app.run_b.as_deref().map(short_id).unwrap_or_else(|| "—".into()),
    );
    let diff_text = match &app.run_diff {
        RunDiff::Idle => Text::from("Select two runs to compare."),
        RunDiff::Loading => Text::from("Diffing..."),
        RunDiff::Ready(diff) if diff.is_empty() => Text::from("(no differences)"),
        RunDiff::Ready(diff) => Text::from(
            diff.lines()
                .map(|l| Line::from(l.to_string()))
                .collect::<Vec<_>>(),
        ),
        RunDiff::Failed(e) => Text::from(Line::from(Span::styled(
            e.clone(),
            Style::default().fg(Color::Red),
        ))),
    };
    f.render_widget(
        Paragraph::new(diff_text)
            .wrap(Wrap { trim: false })
            .block(panel(&diff_title)),
        right[2],
    );
}

fn draw_coder(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let plan = if app.plan.is_empty() {
        "No active plan yet.".to_string()
    } else {
        app.plan.clone()
    };
    f.render_widget(
        Paragraph::new(plan).wrap(Wrap { trim: false }).block(panel("Active Plan")),
        cols[0],
    );

    let workspace = match &app.artifact {
        Some(artifact) => artifact.content.clone(),
        None => "// Code output will appear here".to_string(),
    };
    f.render_widget(
        Paragraph::new(workspace)
            .wrap(Wrap { trim: false })
            .block(panel("Coder Workspace")),
        cols[1],
    );

    let mut call_lines = Vec::new();
    for event in app.events.iter().take(4) {
        call_lines.extend(render::event_dump(event).lines);
    }
    if call_lines.is_empty() {
        call_lines.push(Line::from("No tool calls yet."));
    }
    f.render_widget(
        Paragraph::new(call_lines).block(panel("Recent Tool Calls")),
        rows[1],
    );
}

fn draw_research(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    f.render_widget(
        Paragraph::new(stream_text(app, 10)).block(panel("Research Stream")),
        cols[0],
    );

    let source_lines: Vec<Line> = if app.sources.is_empty() {
        vec![Line::from("No sources indexed.")]
    } else {
        app.sources
            .iter()
            .map(|s| {
                Line::from(vec![
                    Span::styled(
                        truncate(&s.source, 40),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        format!(
                            " chunks={} rank={}",
                            s.chunks.unwrap_or(0),
                            super::format::format_score(s.avg_rank)
                        ),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };
    f.render_widget(
        Paragraph::new(source_lines).block(panel("Sources Tray")),
        cols[1],
    );
}

fn draw_vla(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let hud = match &app.vision_image {
        Some(image) => Text::from(vec![
            Line::from("Latest frame:"),
            Line::from(Span::styled(
                truncate(image, 60),
                Style::default().fg(Color::Cyan),
            )),
        ]),
        None => Text::from("No HUD image yet."),
    };
    f.render_widget(Paragraph::new(hud).block(panel("Vision Feed")), cols[0]);

    f.render_widget(
        Paragraph::new(stream_text(app, 8)).block(panel("Action History")),
        cols[1],
    );
}

fn draw_brain(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(55),
            Constraint::Min(4),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(app.memory_query.clone()).block(panel("Memory Search (type + Enter)")),
        rows[0],
    );

    let result_lines: Vec<Line> = if app.memory_results.is_empty() {
        vec![Line::from("No results yet.")]
    } else {
        app.memory_results
            .iter()
            .flat_map(|m| {
                vec![
                    Line::from(vec![
                        Span::styled(
                            format!("[{}] ", m.kind),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::styled(
                            format!("score {}", super::format::format_score(m.score)),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]),
                    Line::from(truncate(&m.content, 100)),
                ]
            })
            .collect()
    };
    f.render_widget(Paragraph::new(result_lines).block(panel("Results")), rows[1]);

    let mut mesh_lines = render::graph_lines(&app.graph);
    for msg in app.a2a.iter().take(3) {
        let text = msg
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| msg.to_string());
        mesh_lines.push(Line::from(Span::styled(
            format!("a2a: {}", truncate(&text, 60)),
            Style::default().fg(Color::DarkGray),
        )));
    }
    f.render_widget(Paragraph::new(mesh_lines).block(panel("Agent Mesh")), rows[2]);
}

fn draw_governance(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Pending runs with plan steps
    let mut run_lines = Vec::new();
    for run in &app.pending_runs {
        run_lines.push(Line::from(vec![
            Span::styled(
                intent_text(run),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", short_id(&run.run_id)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        run_lines.extend(step_lines(run).into_iter().map(|s| Line::from(format!("  {s}"))));
    }
    if run_lines.is_empty() {
        run_lines.push(Line::from("No pending runs."));
    }
    f.render_widget(
        Paragraph::new(run_lines).block(panel("Pending Approvals (^A run, ^E step)")),
        cols[0],
    );

    // Clarification forms + approval blocks
    let mut block_lines = Vec::new();
    for block in app.form_blocks() {
        let title = block
            .ui
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Clarification needed");
        block_lines.push(Line::from(vec![
            Span::styled(title.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" {}", format_clock(block.timestamp)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        for (idx, field) in form_fields(&block.ui).iter().enumerate() {
            let focused = app.input_mode == InputMode::Form && idx == app.form_cursor;
            let marker = if focused { ">" } else { " " };
            let value = app.clarification_value(&block.id, &field.key);
            block_lines.push(Line::from(vec![
                Span::styled(
                    format!("{marker} {}: ", field.label),
                    if focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    },
                ),
                Span::raw(value.to_string()),
            ]));
        }
        block_lines.push(Line::from(Span::styled(
            "  Tab: next field, Enter: submit",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for block in app.approval_blocks() {
        let title = block
            .ui
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Approval requested");
        block_lines.push(Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        block_lines.push(Line::from(Span::styled(
            "  ^Y approve once, ^U always, ^N never",
            Style::default().fg(Color::DarkGray),
        )));
    }
    if block_lines.is_empty() {
        block_lines.push(Line::from("No approvals or clarifications right now."));
    }
    f.render_widget(
        Paragraph::new(block_lines).block(panel("Approvals & Clarifications")),
        cols[1],
    );
}

fn draw_health(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(33), Constraint::Percentage(33)])
        .split(area);

    f.render_widget(
        Paragraph::new(render::metric_lines(&app.metrics)).block(panel("System Metrics")),
        cols[0],
    );

    let tool_lines: Vec<Line> = if app.tools.is_empty() {
        vec![Line::from("No tools registered.")]
    } else {
        app.tools
            .iter()
            .map(|t| {
                Line::from(vec![
                    Span::styled(
                        t.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(" {}", t.arg_hint.as_deref().unwrap_or(""))),
                    Span::styled(
                        format!(" risk: {}", t.risk.as_deref().unwrap_or("n/a")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };
    f.render_widget(
        Paragraph::new(tool_lines).block(panel("Tool Inventory")),
        cols[1],
    );

    let log_lines: Vec<Line> = app
        .log_lines
        .iter()
        .rev()
        .take(cols[2].height.saturating_sub(2) as usize)
        .rev()
        .map(|l| Line::from(l.clone()))
        .collect();
    f.render_widget(
        Paragraph::new(log_lines).block(panel("Log Tail")),
        cols[2],
    );
}

fn draw_command_bar(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let (title, content) = match app.input_mode {
        InputMode::Memory => (" Memory Query ", app.memory_query.as_str()),
        _ => (" Command ", app.command_input.as_str()),
    };
    let mut line = vec![Span::raw("> "), Span::raw(content.to_string())];
    if !app.suggestions().is_empty() && content.is_empty() {
        line.push(Span::styled(
            format!("  ({})", app.suggestions().join(" | ")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(line)).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        area,
    );
}

fn draw_status(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let persona = app.persona.as_deref().unwrap_or("Default");
    let status = app.status_line.as_deref().unwrap_or("");
    let line = Line::from(vec![
        Span::styled(
            format!(" persona: {persona} "),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            "| events: {} | pending: {} | metrics: {} ",
            app.events.len(),
            app.pending_runs.len(),
            app.metrics.len()
        )),
        Span::styled(status.to_string(), Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Centered overlay rect: three quarters of the area each way. Widened
/// intermediate math so extreme terminal sizes cannot overflow u16.
fn sheet_rect(area: Rect) -> Rect {
    Rect {
        x: area.width / 8,
        y: area.height / 8,
        width: (u32::from(area.width) * 3 / 4) as u16,
        height: (u32::from(area.height) * 3 / 4) as u16,
    }
}

/// Centered overlay sheet for the config editor.
fn draw_config_sheet(f: &mut Frame, app: &DashboardApp) {
    let sheet = sheet_rect(f.area());
    f.render_widget(Clear, sheet);
    f.render_widget(
        Paragraph::new(app.config_text.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Configuration (^S save, Esc close) ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            ),
        sheet,
    );
}
