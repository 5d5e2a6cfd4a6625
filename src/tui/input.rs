//! Key binding dispatch for the dashboard.
//!
//! Pure state transitions: keys mutate the model and queue
//! `OutboundRequest`s; the runner does the actual sends.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

use crate::command::Command;
use crate::governance::{form_fields, RunDiff};

use super::app::{DashboardApp, InputMode, OutboundRequest, Tab};

/// Where typed characters go on a given tab.
fn mode_for_tab(tab: Tab) -> InputMode {
    match tab {
        Tab::Brain => InputMode::Memory,
        Tab::Governance => InputMode::Form,
        _ => InputMode::Command,
    }
}

/// Handle a key event, mutating app state.
pub fn handle_key(app: &mut DashboardApp, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global bindings
    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::F(n @ 1..=7) => {
            app.active_tab = Tab::ALL[(n - 1) as usize];
            if !app.config_editor_open {
                app.input_mode = mode_for_tab(app.active_tab);
            }
            app.form_cursor = 0;
            return;
        }
        KeyCode::Char('o') if ctrl => {
            app.config_editor_open = !app.config_editor_open;
            app.input_mode = if app.config_editor_open {
                InputMode::ConfigEditor
            } else {
                mode_for_tab(app.active_tab)
            };
            return;
        }
        KeyCode::Char('p') if ctrl => {
            cycle_persona(app);
            return;
        }
        KeyCode::Char('a') if ctrl => {
            if let Some(run) = app.pending_runs.first() {
                let run_id = run.run_id.clone();
                app.status_line = Some(format!("approving {run_id}"));
                app.push_outbound(OutboundRequest::Approve(run_id));
            }
            return;
        }
        KeyCode::Char('e') if ctrl => {
            app.push_outbound(OutboundRequest::ApproveStep);
            return;
        }
        KeyCode::Char('d') if ctrl => {
            request_run_diff(app);
            return;
        }
        KeyCode::Char('j') if ctrl => {
            app.run_a = cycle_run(&app.run_history, app.run_a.as_deref());
            return;
        }
        KeyCode::Char('k') if ctrl => {
            app.run_b = cycle_run(&app.run_history, app.run_b.as_deref());
            return;
        }
        _ => {}
    }

    // Approval-block quick commands (Governance tab only; Ctrl-chords so
    // form typing stays free).
    if app.active_tab == Tab::Governance && ctrl {
        let quick = match key.code {
            KeyCode::Char('y') => Some(Command::ApproveOnce),
            KeyCode::Char('u') => Some(Command::ApproveAlways),
            KeyCode::Char('n') => Some(Command::ApproveNever),
            _ => None,
        };
        if let Some(cmd) = quick {
            app.push_outbound(OutboundRequest::Dispatch(cmd));
            return;
        }
    }

    match app.input_mode {
        InputMode::Command => handle_command_key(app, key),
        InputMode::Memory => handle_memory_key(app, key),
        InputMode::ConfigEditor => handle_config_key(app, key),
        InputMode::Form => handle_form_key(app, key),
    }
}

fn handle_command_key(app: &mut DashboardApp, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let cmd = app.command_input.trim().to_string();
            if cmd.is_empty() {
                return;
            }
            app.record_command(&cmd);
            app.push_outbound(OutboundRequest::Dispatch(Command::Free(cmd)));
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Up => {
            let next = match app.history_cursor {
                None if !app.command_history.is_empty() => Some(0),
                Some(i) if i + 1 < app.command_history.len() => Some(i + 1),
                other => other,
            };
            if let Some(i) = next {
                app.command_input = app.command_history[i].clone();
                app.history_cursor = Some(i);
            }
        }
        KeyCode::Down => match app.history_cursor {
            Some(0) | None => {
                app.command_input.clear();
                app.history_cursor = None;
            }
            Some(i) => {
                app.command_input = app.command_history[i - 1].clone();
                app.history_cursor = Some(i - 1);
            }
        },
        KeyCode::Esc => {
            if app.command_input.is_empty() {
                app.should_quit = true;
            } else {
                app.command_input.clear();
                app.history_cursor = None;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
}

fn handle_memory_key(app: &mut DashboardApp, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let query = app.memory_query.trim().to_string();
            if !query.is_empty() {
                app.push_outbound(OutboundRequest::MemorySearch(query));
            }
        }
        KeyCode::Backspace => {
            app.memory_query.pop();
        }
        KeyCode::Esc => app.memory_query.clear(),
        KeyCode::Char(c) => app.memory_query.push(c),
        _ => {}
    }
}

fn handle_config_key(app: &mut DashboardApp, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => {
            // Validate locally; an invalid document never leaves the client.
            match serde_json::from_str::<Value>(&app.config_text) {
                Ok(parsed) => {
                    app.status_line = Some("config saved".into());
                    app.push_outbound(OutboundRequest::SaveConfig(parsed));
                    app.config_editor_open = false;
                    app.input_mode = mode_for_tab(app.active_tab);
                }
                Err(e) => {
                    app.status_line = Some(format!("invalid JSON: {e}"));
                }
            }
        }
        KeyCode::Esc => {
            app.config_editor_open = false;
            app.input_mode = mode_for_tab(app.active_tab);
        }
        KeyCode::Enter => app.config_text.push('\n'),
        KeyCode::Backspace => {
            app.config_text.pop();
        }
        KeyCode::Char(c) => app.config_text.push(c),
        _ => {}
    }
}

fn handle_form_key(app: &mut DashboardApp, key: KeyEvent) {
    // Typing targets the first visible form block.
    let Some((block_id, fields)) = app
        .form_blocks()
        .first()
        .map(|b| (b.id.clone(), form_fields(&b.ui)))
    else {
        // No form on screen: fall through to command-bar behavior.
        handle_command_key(app, key);
        return;
    };
    if fields.is_empty() {
        handle_command_key(app, key);
        return;
    }
    let field_key = fields[app.form_cursor % fields.len()].key.clone();

    match key.code {
        KeyCode::Tab => app.form_cursor = (app.form_cursor + 1) % fields.len(),
        KeyCode::Enter => {
            let values = app.clarification_json(&block_id);
            app.push_outbound(OutboundRequest::Dispatch(Command::SubmitForm(values)));
            app.status_line = Some("form submitted".into());
        }
        KeyCode::Backspace => app.clarification_pop(&block_id, &field_key),
        KeyCode::Esc => app.input_mode = InputMode::Command,
        KeyCode::Char(c) => app.clarification_push(&block_id, &field_key, c),
        _ => {}
    }
}

fn cycle_persona(app: &mut DashboardApp) {
    if app.personas.is_empty() {
        return;
    }
    let next = match &app.persona {
        None => 0,
        Some(current) => app
            .personas
            .iter()
            .position(|p| &p.id == current)
            .map(|i| (i + 1) % app.personas.len())
            .unwrap_or(0),
    };
    let id = app.personas[next].id.clone();
    app.persona = Some(id.clone());
    app.push_outbound(OutboundRequest::Dispatch(Command::Profile(id)));
}

fn request_run_diff(app: &mut DashboardApp) {
    if let (Some(a), Some(b)) = (app.run_a.clone(), app.run_b.clone()) {
        app.run_diff = RunDiff::Loading;
        app.push_outbound(OutboundRequest::RunDiff { run_a: a, run_b: b });
    } else {
        app.status_line = Some("select two runs to diff".into());
    }
}

fn cycle_run(
    history: &[crate::api::types::RunHistoryEntry],
    current: Option<&str>,
) -> Option<String> {
    if history.is_empty() {
        return current.map(str::to_string);
    }
    let next = match current {
        None => 0,
        Some(id) => history
            .iter()
            .position(|r| r.run_id == id)
            .map(|i| (i + 1) % history.len())
            .unwrap_or(0),
    };
    Some(history[next].run_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CockpitSnapshot;
    use crate::tui::event::{SliceUpdate, UiMessage};
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut DashboardApp, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = DashboardApp::new();
        handle_key(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn function_keys_switch_tabs_and_mode() {
        let mut app = DashboardApp::new();
        handle_key(&mut app, key(KeyCode::F(5)));
        assert_eq!(app.active_tab, Tab::Brain);
        assert_eq!(app.input_mode, InputMode::Memory);
        handle_key(&mut app, key(KeyCode::F(1)));
        assert_eq!(app.active_tab, Tab::Mission);
        assert_eq!(app.input_mode, InputMode::Command);
    }

    #[test]
    fn enter_dispatches_free_command() {
        let mut app = DashboardApp::new();
        type_text(&mut app, "book a flight");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.take_outbound(),
            vec![OutboundRequest::Dispatch(Command::Free(
                "book a flight".into()
            ))]
        );
        assert!(app.command_input.is_empty());
        assert_eq!(app.command_history[0], "book a flight");
    }

    #[test]
    fn empty_command_sends_nothing() {
        let mut app = DashboardApp::new();
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.take_outbound().is_empty());
    }

    #[test]
    fn history_recall_up_down() {
        let mut app = DashboardApp::new();
        app.record_command("second");
        app.record_command("first");
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.command_input, "first");
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.command_input, "second");
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.command_input, "first");
        handle_key(&mut app, key(KeyCode::Down));
        assert!(app.command_input.is_empty());
    }

    #[test]
    fn config_save_rejects_invalid_json_locally() {
        let mut app = DashboardApp::new();
        handle_key(&mut app, ctrl('o'));
        assert!(app.config_editor_open);
        app.config_text = "{broken".into();
        handle_key(&mut app, ctrl('s'));
        assert!(app.status_line.as_ref().unwrap().contains("invalid JSON"));
        assert!(app.take_outbound().is_empty());
        assert!(app.config_editor_open);
    }

    #[test]
    fn config_save_queues_valid_updates() {
        let mut app = DashboardApp::new();
        handle_key(&mut app, ctrl('o'));
        app.config_text = r#"{"max_steps": 5}"#.into();
        handle_key(&mut app, ctrl('s'));
        assert_eq!(
            app.take_outbound(),
            vec![OutboundRequest::SaveConfig(json!({"max_steps": 5}))]
        );
        assert!(!app.config_editor_open);
    }

    #[test]
    fn approve_targets_first_pending_run() {
        let mut app = DashboardApp::new();
        app.pending_runs =
            vec![serde_json::from_value(json!({"run_id": "r7"})).unwrap()];
        handle_key(&mut app, ctrl('a'));
        assert_eq!(app.take_outbound(), vec![OutboundRequest::Approve("r7".into())]);
    }

    #[test]
    fn run_diff_needs_both_selections() {
        let mut app = DashboardApp::new();
        handle_key(&mut app, ctrl('d'));
        assert!(app.take_outbound().is_empty());
        assert_eq!(app.run_diff, RunDiff::Idle);

        app.run_a = Some("a".into());
        app.run_b = Some("b".into());
        handle_key(&mut app, ctrl('d'));
        assert_eq!(app.run_diff, RunDiff::Loading);
        assert_eq!(
            app.take_outbound(),
            vec![OutboundRequest::RunDiff {
                run_a: "a".into(),
                run_b: "b".into()
            }]
        );
    }

    #[test]
    fn form_typing_and_submit() {
        let mut app = DashboardApp::new();
        let snapshot: CockpitSnapshot = serde_json::from_value(json!({
            "events": [{
                "event_type": "ui_block",
                "payload": {"ui": {"type": "form", "fields": ["city", "date"]}}
            }]
        }))
        .unwrap();
        app.update(UiMessage::Slice(SliceUpdate::Cockpit(snapshot)));
        handle_key(&mut app, key(KeyCode::F(6)));
        assert_eq!(app.input_mode, InputMode::Form);

        type_text(&mut app, "Tokyo");
        handle_key(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "friday");
        assert_eq!(app.clarification_value("ui_block-0", "city"), "Tokyo");
        assert_eq!(app.clarification_value("ui_block-0", "date"), "friday");

        handle_key(&mut app, key(KeyCode::Enter));
        let out = app.take_outbound();
        assert_eq!(out.len(), 1);
        let OutboundRequest::Dispatch(cmd) = &out[0] else {
            panic!("expected dispatch");
        };
        assert_eq!(
            cmd.encode(),
            r#"submit_form {"city":"Tokyo","date":"friday"}"#
        );
    }

    #[test]
    fn governance_quick_approvals() {
        let mut app = DashboardApp::new();
        handle_key(&mut app, key(KeyCode::F(6)));
        handle_key(&mut app, ctrl('y'));
        handle_key(&mut app, ctrl('u'));
        handle_key(&mut app, ctrl('n'));
        assert_eq!(
            app.take_outbound(),
            vec![
                OutboundRequest::Dispatch(Command::ApproveOnce),
                OutboundRequest::Dispatch(Command::ApproveAlways),
                OutboundRequest::Dispatch(Command::ApproveNever),
            ]
        );
    }

    #[test]
    fn persona_cycle_dispatches_profile() {
        let mut app = DashboardApp::new();
        handle_key(&mut app, ctrl('p'));
        assert_eq!(app.persona.as_deref(), Some("Coder"));
        assert_eq!(
            app.take_outbound(),
            vec![OutboundRequest::Dispatch(Command::Profile("Coder".into()))]
        );
        handle_key(&mut app, ctrl('p'));
        assert_eq!(app.persona.as_deref(), Some("Researcher"));
    }
}
