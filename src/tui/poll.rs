//! Poll/reconcile loop — one isolated task per state slice.
//!
//! Every tick spawns an independent fetch per slice; each sends its
//! complete decoded value over the shared channel, or (on any failure)
//! sends nothing and logs at debug. One flaky endpoint degrades one
//! panel, never the page. Overlapping cycles are neither sequenced nor
//! cancelled: replacement is atomic and idempotent per slice, so a late
//! result is stale but never corrupt.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};

use super::event::{SliceUpdate, UiMessage};

macro_rules! poll_slice {
    ($client:expr, $tx:expr, $name:literal, $fetch:ident, $wrap:expr) => {{
        let client = $client.clone();
        let tx = $tx.clone();
        tokio::spawn(async move {
            match client.$fetch().await {
                Ok(value) => {
                    let _ = tx.send(UiMessage::Slice($wrap(value)));
                }
                Err(e) => debug!("poll {}: {e}", $name),
            }
        });
    }};
}

/// Kick off one poll cycle: every slice fetched concurrently, each
/// isolated from the others' success or failure.
pub fn spawn_poll_cycle(client: &ApiClient, tx: &UnboundedSender<UiMessage>) {
    poll_slice!(client, tx, "cockpit", cockpit, SliceUpdate::Cockpit);
    poll_slice!(client, tx, "tools", tools, SliceUpdate::Tools);
    poll_slice!(client, tx, "rag_sources", rag_sources, SliceUpdate::Sources);
    poll_slice!(client, tx, "config", config, SliceUpdate::Config);
    poll_slice!(client, tx, "log_tail", log_tail, |tail: crate::api::types::LogTail| {
        SliceUpdate::LogTail(tail.lines)
    });
    poll_slice!(client, tx, "vla_latest", vla_latest, |frame: crate::api::types::VisionFrame| {
        SliceUpdate::Vision(frame.image)
    });
    poll_slice!(client, tx, "graph", graph, SliceUpdate::Graph);
    poll_slice!(client, tx, "roles", roles, SliceUpdate::Personas);
    poll_slice!(client, tx, "pending_runs", pending_runs, SliceUpdate::PendingRuns);
    poll_slice!(client, tx, "runs", runs, SliceUpdate::RunHistory);
}

fn report<T>(name: &str, result: &Result<T, ApiError>, describe: impl Fn(&T) -> String) {
    match result {
        Ok(value) => info!("{name}: {}", describe(value)),
        Err(e) => warn!("{name}: {e}"),
    }
}

/// Headless probe (`--once`): fetch every slice sequentially, log a
/// one-line summary each, exit. Per-slice failures are reported, not
/// fatal.
pub async fn probe_once(client: &ApiClient) -> anyhow::Result<()> {
    report("cockpit", &client.cockpit().await, |s| {
        format!(
            "{} events, {} a2a, {} metrics",
            s.events.len(),
            s.a2a.len(),
            s.metrics.len()
        )
    });
    report("tools", &client.tools().await, |t| format!("{} tools", t.len()));
    report("rag_sources", &client.rag_sources().await, |s| {
        format!("{} sources", s.len())
    });
    report("config", &client.config().await, |c| {
        format!(
            "{} keys",
            c.as_object().map(serde_json::Map::len).unwrap_or(0)
        )
    });
    report("log_tail", &client.log_tail().await, |l| {
        format!("{} lines", l.lines.len())
    });
    report("vla_latest", &client.vla_latest().await, |v| {
        String::from(if v.image.is_some() { "frame present" } else { "no frame" })
    });
    report("graph", &client.graph().await, |g| {
        format!("{} nodes, {} edges", g.nodes.len(), g.edges.len())
    });
    report("roles", &client.roles().await, |r| format!("{} personas", r.len()));
    report("pending_runs", &client.pending_runs().await, |r| {
        format!("{} pending", r.len())
    });
    report("runs", &client.runs().await, |r| format!("{} runs", r.len()));
    Ok(())
}
