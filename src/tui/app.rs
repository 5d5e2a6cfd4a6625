//! DashboardApp — the TEA model.
//!
//! All state lives here: the polled slices (replaced atomically, one
//! `SliceUpdate` at a time) and the operator's ephemeral interaction
//! state (command text, form values, run selection), which poll results
//! never overwrite. Update receives `UiMessage`s and mutates state; the
//! view reads state to produce widgets. No side effects in update —
//! outbound work is queued as `OutboundRequest`s the runner consumes.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::api::types::{Event, GraphData, MemoryResult, PendingRun, Persona, Source, Tool};
use crate::command::Command;
use crate::genui::{extract_artifact, extract_ui_blocks, Artifact, UiBlock};
use crate::governance::{default_run_selection, RunDiff};
use crate::tui::event::{SliceUpdate, UiMessage};
use crate::tui::input;

/// Commands retained for history/suggestions.
const COMMAND_HISTORY_CAP: usize = 10;
const SUGGESTION_COUNT: usize = 5;

/// Built-in persona catalog, replaced only by a non-empty `/api/roles`.
pub fn default_personas() -> Vec<Persona> {
    [
        ("Coder", "Coder Agent"),
        ("Researcher", "Research Agent"),
        ("VLA", "VLA Agent"),
        ("Reviewer", "Reviewer Agent"),
        ("Legal", "Legal Agent"),
    ]
    .into_iter()
    .map(|(id, label)| Persona {
        id: id.into(),
        label: Some(label.into()),
    })
    .collect()
}

/// Which navigation tab is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Mission,
    Coder,
    Research,
    Vla,
    Brain,
    Governance,
    Health,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Mission,
        Tab::Coder,
        Tab::Research,
        Tab::Vla,
        Tab::Brain,
        Tab::Governance,
        Tab::Health,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Mission => "Mission Control",
            Tab::Coder => "Coder",
            Tab::Research => "Research",
            Tab::Vla => "VLA",
            Tab::Brain => "Brain",
            Tab::Governance => "Governance",
            Tab::Health => "Health",
        }
    }
}

/// Where typed characters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// The omni command bar (default).
    Command,
    /// The memory query box (Brain tab).
    Memory,
    /// The config editor sheet.
    ConfigEditor,
    /// A clarification form field (Governance tab).
    Form,
}

/// Outbound work queued by update, consumed and spawned by the runner.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundRequest {
    Dispatch(Command),
    Approve(String),
    ApproveStep,
    SaveConfig(Value),
    MemorySearch(String),
    RunDiff { run_a: String, run_b: String },
}

/// The main TUI application state (TEA model).
pub struct DashboardApp {
    /// Which tab is currently visible.
    pub active_tab: Tab,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Where typed characters currently go.
    pub input_mode: InputMode,

    // -- polled slices (each replaced atomically, never partially) --
    pub events: Vec<Event>,
    pub a2a: Vec<Value>,
    pub metrics: serde_json::Map<String, Value>,
    pub tools: Vec<Tool>,
    pub sources: Vec<Source>,
    /// Backend config JSON, pretty-printed for the editor sheet.
    pub config_text: String,
    pub log_lines: Vec<String>,
    /// Latest vision frame reference (data URI or URL).
    pub vision_image: Option<String>,
    pub graph: GraphData,
    pub personas: Vec<Persona>,
    pub pending_runs: Vec<PendingRun>,
    pub run_history: Vec<crate::api::types::RunHistoryEntry>,

    // -- derived from the event slice, recomputed on each cockpit update --
    pub artifact: Option<Artifact>,
    pub ui_blocks: Vec<UiBlock>,

    // -- ephemeral interaction state, owned here, never poll-overwritten --
    pub command_input: String,
    pub command_history: Vec<String>,
    /// Index into command_history while recalling with Up/Down.
    pub history_cursor: Option<usize>,
    /// Last plan text the backend returned for a command.
    pub plan: String,
    pub persona: Option<String>,
    pub memory_query: String,
    pub memory_results: Vec<MemoryResult>,
    pub run_a: Option<String>,
    pub run_b: Option<String>,
    pub run_diff: RunDiff,
    /// Form values keyed by block id, then field key (sorted, so
    /// submissions serialize deterministically). Best-effort across
    /// polls: block ids are positional within one event list.
    pub clarifications: HashMap<String, BTreeMap<String, String>>,
    /// Field index focused within the first form block (Governance tab).
    pub form_cursor: usize,
    /// Whether the config editor sheet is open (poll skips config while true).
    pub config_editor_open: bool,
    /// One-line status/error message shown in the status bar.
    pub status_line: Option<String>,
    /// Outbound requests queued for the runner.
    pub outbound: Vec<OutboundRequest>,
}

impl DashboardApp {
    pub fn new() -> Self {
        Self {
            active_tab: Tab::Mission,
            should_quit: false,
            input_mode: InputMode::Command,
            events: Vec::new(),
            a2a: Vec::new(),
            metrics: serde_json::Map::new(),
            tools: Vec::new(),
            sources: Vec::new(),
            config_text: "{}".into(),
            log_lines: Vec::new(),
            vision_image: None,
            graph: GraphData::default(),
            personas: default_personas(),
            pending_runs: Vec::new(),
            run_history: Vec::new(),
            artifact: None,
            ui_blocks: Vec::new(),
            command_input: String::new(),
            command_history: Vec::new(),
            history_cursor: None,
            plan: String::new(),
            persona: None,
            memory_query: String::new(),
            memory_results: Vec::new(),
            run_a: None,
            run_b: None,
            run_diff: RunDiff::Idle,
            clarifications: HashMap::new(),
            form_cursor: 0,
            config_editor_open: false,
            status_line: None,
            outbound: Vec::new(),
        }
    }

    /// TEA update: apply one message.
    pub fn update(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::Input(key) => input::handle_key(self, key),
            UiMessage::Slice(update) => self.apply_slice(update),
            UiMessage::Plan(plan) => self.plan = plan,
            UiMessage::MemoryResults(results) => self.memory_results = results,
            UiMessage::RunDiff(result) => {
                self.run_diff = match result {
                    Ok(diff) => RunDiff::Ready(diff),
                    Err(e) => RunDiff::Failed(e),
                };
            }
            UiMessage::Quit => self.should_quit = true,
        }
    }

    /// Replace one state slice. Atomic by construction: the update
    /// carries a complete decoded value or was never sent.
    fn apply_slice(&mut self, update: SliceUpdate) {
        match update {
            SliceUpdate::Cockpit(snapshot) => {
                self.events = snapshot.events;
                self.a2a = snapshot.a2a;
                self.metrics = snapshot.metrics;
                self.artifact = extract_artifact(&self.events);
                self.ui_blocks = extract_ui_blocks(&self.events);
            }
            SliceUpdate::Tools(tools) => self.tools = tools,
            SliceUpdate::Sources(sources) => self.sources = sources,
            SliceUpdate::Config(config) => {
                // Never clobber an edit in progress.
                if !self.config_editor_open {
                    self.config_text = serde_json::to_string_pretty(&config)
                        .unwrap_or_else(|_| "{}".into());
                }
            }
            SliceUpdate::LogTail(lines) => self.log_lines = lines,
            SliceUpdate::Vision(image) => self.vision_image = image,
            SliceUpdate::Graph(graph) => self.graph = graph,
            SliceUpdate::Personas(personas) => {
                // The built-in catalog stands until the backend offers one.
                if !personas.is_empty() {
                    self.personas = personas;
                }
            }
            SliceUpdate::PendingRuns(runs) => self.pending_runs = runs,
            SliceUpdate::RunHistory(runs) => {
                default_run_selection(&runs, &mut self.run_a, &mut self.run_b);
                self.run_history = runs;
            }
        }
    }

    /// Queue an outbound request for the runner to spawn.
    pub fn push_outbound(&mut self, request: OutboundRequest) {
        self.outbound.push(request);
    }

    /// Drain queued outbound requests (runner side).
    pub fn take_outbound(&mut self) -> Vec<OutboundRequest> {
        std::mem::take(&mut self.outbound)
    }

    /// Record a sent command: dedupe, newest first, capped.
    pub fn record_command(&mut self, cmd: &str) {
        self.command_history.retain(|c| c != cmd);
        self.command_history.insert(0, cmd.to_string());
        self.command_history.truncate(COMMAND_HISTORY_CAP);
        self.history_cursor = None;
    }

    /// The first few history entries, shown as suggestions.
    pub fn suggestions(&self) -> &[String] {
        let n = self.command_history.len().min(SUGGESTION_COUNT);
        &self.command_history[..n]
    }

    /// Form blocks currently visible (Governance tab).
    pub fn form_blocks(&self) -> Vec<&UiBlock> {
        self.ui_blocks
            .iter()
            .filter(|b| b.ui.get("type").and_then(Value::as_str) == Some("form"))
            .collect()
    }

    /// Approval blocks currently visible (Governance tab).
    pub fn approval_blocks(&self) -> Vec<&UiBlock> {
        self.ui_blocks
            .iter()
            .filter(|b| b.ui.get("type").and_then(Value::as_str) == Some("approval"))
            .collect()
    }

    /// The entered value for one form field, if any.
    pub fn clarification_value(&self, block_id: &str, key: &str) -> &str {
        self.clarifications
            .get(block_id)
            .and_then(|fields| fields.get(key))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Append a character to one form field's value.
    pub fn clarification_push(&mut self, block_id: &str, key: &str, c: char) {
        self.clarifications
            .entry(block_id.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .push(c);
    }

    /// Remove the last character of one form field's value.
    pub fn clarification_pop(&mut self, block_id: &str, key: &str) {
        if let Some(value) = self
            .clarifications
            .get_mut(block_id)
            .and_then(|fields| fields.get_mut(key))
        {
            value.pop();
        }
    }

    /// Entered values of one form block, as the JSON object to submit.
    pub fn clarification_json(&self, block_id: &str) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(fields) = self.clarifications.get(block_id) {
            for (key, value) in fields {
                map.insert(key.clone(), Value::String(value.clone()));
            }
        }
        Value::Object(map)
    }
}

impl Default for DashboardApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CockpitSnapshot;
    use serde_json::json;

    fn tool(name: &str) -> Tool {
        serde_json::from_value(json!({ "name": name })).unwrap()
    }

    fn history(ids: &[&str]) -> Vec<crate::api::types::RunHistoryEntry> {
        ids.iter()
            .map(|id| serde_json::from_value(json!({ "run_id": id })).unwrap())
            .collect()
    }

    #[test]
    fn slice_failure_leaves_prior_value() {
        let mut app = DashboardApp::new();
        app.update(UiMessage::Slice(SliceUpdate::Tools(vec![tool("shell")])));
        // The tools fetch fails this cycle: no message arrives for that
        // slice, while other slices keep updating.
        app.update(UiMessage::Slice(SliceUpdate::LogTail(vec!["line".into()])));
        assert_eq!(app.tools.len(), 1);
        assert_eq!(app.tools[0].name, "shell");
        assert_eq!(app.log_lines, vec!["line".to_string()]);
    }

    #[test]
    fn cockpit_update_recomputes_derived_state() {
        let mut app = DashboardApp::new();
        let snapshot: CockpitSnapshot = serde_json::from_value(json!({
            "events": [
                {"event_type": "agent_output", "payload": "```html\n<p>x</p>\n```"},
                {"event_type": "ui_block", "payload": {"ui": {"type": "form", "fields": ["city"]}}}
            ]
        }))
        .unwrap();
        app.update(UiMessage::Slice(SliceUpdate::Cockpit(snapshot)));
        assert_eq!(app.artifact.as_ref().unwrap().content, "<p>x</p>");
        assert_eq!(app.ui_blocks.len(), 1);
        assert_eq!(app.ui_blocks[0].id, "ui_block-1");
    }

    #[test]
    fn run_history_defaults_selection_once() {
        let mut app = DashboardApp::new();
        app.update(UiMessage::Slice(SliceUpdate::RunHistory(history(&[
            "r2", "r1",
        ]))));
        assert_eq!(app.run_a.as_deref(), Some("r2"));
        assert_eq!(app.run_b.as_deref(), Some("r1"));

        // A later poll must not override the (now-set) selection.
        app.update(UiMessage::Slice(SliceUpdate::RunHistory(history(&[
            "r9", "r2", "r1",
        ]))));
        assert_eq!(app.run_a.as_deref(), Some("r2"));
    }

    #[test]
    fn personas_replaced_only_when_nonempty() {
        let mut app = DashboardApp::new();
        let builtin = app.personas.len();
        app.update(UiMessage::Slice(SliceUpdate::Personas(vec![])));
        assert_eq!(app.personas.len(), builtin);

        app.update(UiMessage::Slice(SliceUpdate::Personas(vec![Persona {
            id: "Pilot".into(),
            label: None,
        }])));
        assert_eq!(app.personas.len(), 1);
    }

    #[test]
    fn config_poll_skipped_while_editing() {
        let mut app = DashboardApp::new();
        app.config_editor_open = true;
        app.config_text = "{\"edited\": true".into();
        app.update(UiMessage::Slice(SliceUpdate::Config(json!({"a": 1}))));
        assert_eq!(app.config_text, "{\"edited\": true");

        app.config_editor_open = false;
        app.update(UiMessage::Slice(SliceUpdate::Config(json!({"a": 1}))));
        assert!(app.config_text.contains("\"a\": 1"));
    }

    #[test]
    fn command_history_dedupes_and_caps() {
        let mut app = DashboardApp::new();
        for i in 0..12 {
            app.record_command(&format!("cmd {i}"));
        }
        app.record_command("cmd 11");
        assert_eq!(app.command_history.len(), COMMAND_HISTORY_CAP);
        assert_eq!(app.command_history[0], "cmd 11");
        assert_eq!(app.suggestions().len(), SUGGESTION_COUNT);
    }

    #[test]
    fn clarification_values_survive_repoll() {
        let mut app = DashboardApp::new();
        for c in "Tokyo".chars() {
            app.clarification_push("ui_block-0", "city", c);
        }
        // Poll replaces the event list; entered values stay.
        app.update(UiMessage::Slice(SliceUpdate::Cockpit(
            CockpitSnapshot::default(),
        )));
        assert_eq!(app.clarification_value("ui_block-0", "city"), "Tokyo");
        assert_eq!(
            app.clarification_json("ui_block-0"),
            json!({"city": "Tokyo"})
        );
    }

    #[test]
    fn clarification_pop_edits_in_place() {
        let mut app = DashboardApp::new();
        app.clarification_push("b1", "k", 'a');
        app.clarification_push("b1", "k", 'b');
        app.clarification_pop("b1", "k");
        assert_eq!(app.clarification_value("b1", "k"), "a");
        // Popping a never-entered field is a no-op.
        app.clarification_pop("b2", "k");
    }

    #[test]
    fn run_diff_message_transitions() {
        let mut app = DashboardApp::new();
        app.update(UiMessage::RunDiff(Ok("diff body".into())));
        assert_eq!(app.run_diff, RunDiff::Ready("diff body".into()));
        app.update(UiMessage::RunDiff(Err("Diff failed: 500".into())));
        assert_eq!(app.run_diff, RunDiff::Failed("Diff failed: 500".into()));
    }

    #[test]
    fn form_and_approval_block_filters() {
        let mut app = DashboardApp::new();
        let snapshot: CockpitSnapshot = serde_json::from_value(json!({
            "events": [
                {"event_type": "ui_block", "payload": {"ui": {"type": "form"}}},
                {"event_type": "ui_block", "payload": {"ui": {"type": "approval"}}},
                {"event_type": "ui_block", "payload": {"ui": {"type": "table"}}}
            ]
        }))
        .unwrap();
        app.update(UiMessage::Slice(SliceUpdate::Cockpit(snapshot)));
        assert_eq!(app.form_blocks().len(), 1);
        assert_eq!(app.approval_blocks().len(), 1);
    }
}
