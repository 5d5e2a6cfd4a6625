//! TUI runner — main loop that wires everything together.
//!
//! Creates the terminal, schedules the poll and render ticks, routes
//! keyboard input, and spawns queued outbound requests. The rendering
//! loop never blocks on the network: all fetches and dispatches run as
//! detached tasks reporting back over the message channel.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::interval;
use tracing::debug;

use crate::api::types::CommandResponse;
use crate::api::ApiClient;
use crate::config::ClientConfig;

use super::app::{DashboardApp, OutboundRequest};
use super::event::UiMessage;
use super::{layout, poll};

const RENDER_INTERVAL_MS: u64 = 100;

/// The plan text to display for a command response: the backend's plan,
/// or a dump of whatever else it returned.
fn plan_text(response: &CommandResponse) -> String {
    match &response.plan {
        Some(plan) => plan.clone(),
        None => serde_json::to_string_pretty(&response.extra).unwrap_or_default(),
    }
}

/// Spawn one queued outbound request as a detached task. Fire-and-forget:
/// failures are logged, never retried.
fn spawn_outbound(request: OutboundRequest, client: &ApiClient, tx: &UnboundedSender<UiMessage>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match request {
            OutboundRequest::Dispatch(cmd) => match cmd.dispatch(&client).await {
                Ok(response) => {
                    let _ = tx.send(UiMessage::Plan(plan_text(&response)));
                }
                Err(e) => debug!("dispatch: {e}"),
            },
            OutboundRequest::Approve(run_id) => {
                if let Err(e) = client.approve(&run_id).await {
                    debug!("approve {run_id}: {e}");
                }
            }
            OutboundRequest::ApproveStep => {
                if let Err(e) = client.approve_step().await {
                    debug!("approve_step: {e}");
                }
            }
            OutboundRequest::SaveConfig(updates) => {
                if let Err(e) = client.save_config(&updates).await {
                    debug!("save_config: {e}");
                }
            }
            OutboundRequest::MemorySearch(query) => match client.memory_search(&query).await {
                Ok(results) => {
                    let _ = tx.send(UiMessage::MemoryResults(results));
                }
                Err(e) => debug!("memory_search: {e}"),
            },
            OutboundRequest::RunDiff { run_a, run_b } => {
                let result = client
                    .run_diff(&run_a, &run_b)
                    .await
                    .map_err(|e| format!("Diff failed: {e}"));
                let _ = tx.send(UiMessage::RunDiff(result));
            }
        }
    });
}

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(client: ApiClient, config: &ClientConfig) -> anyhow::Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashboardApp::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // First tick fires immediately — the startup fetch.
    let mut poll_tick = interval(Duration::from_millis(config.poll_interval_ms.max(100)));
    let mut render_tick = interval(Duration::from_millis(RENDER_INTERVAL_MS));

    loop {
        tokio::select! {
            _ = poll_tick.tick() => {
                poll::spawn_poll_cycle(&client, &tx);
            }
            _ = render_tick.tick() => {
                terminal.draw(|f| layout::draw(f, &app))?;
            }
            Some(msg) = rx.recv() => {
                app.update(msg);
            }
            // Poll crossterm events without blocking the async loop.
            result = tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            }) => {
                if let Ok(Some(Event::Key(key))) = result {
                    app.update(UiMessage::Input(key));
                }
            }
        }

        for request in app.take_outbound() {
            spawn_outbound(request, &client, &tx);
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
