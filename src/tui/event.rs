//! TUI messages — everything that drives the update loop.
//!
//! Slice updates, keyboard input, and async operation results all flow
//! through a single mpsc channel as `UiMessage`s. One variant per state
//! slice keeps replacement atomic: a slice either arrives complete or
//! not at all.

use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::api::types::{
    CockpitSnapshot, GraphData, MemoryResult, PendingRun, Persona, RunHistoryEntry, Source, Tool,
};

/// A complete, decoded replacement value for one polled state slice.
#[derive(Debug, Clone)]
pub enum SliceUpdate {
    Cockpit(CockpitSnapshot),
    Tools(Vec<Tool>),
    Sources(Vec<Source>),
    Config(Value),
    LogTail(Vec<String>),
    Vision(Option<String>),
    Graph(GraphData),
    Personas(Vec<Persona>),
    PendingRuns(Vec<PendingRun>),
    RunHistory(Vec<RunHistoryEntry>),
}

/// Messages that drive the TUI update loop.
#[derive(Debug, Clone)]
pub enum UiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// One state slice finished fetching.
    Slice(SliceUpdate),
    /// The backend answered a command with a plan.
    Plan(String),
    /// Memory search results arrived.
    MemoryResults(Vec<MemoryResult>),
    /// Run diff finished: the diff text, or a displayable error.
    RunDiff(Result<String, String>),
    /// Quit the TUI.
    Quit,
}
