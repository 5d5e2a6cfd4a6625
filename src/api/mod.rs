//! HTTP client for the control-plane API.
//!
//! No interpretation here — just typed requests against the backend's
//! endpoints via reqwest. Non-success statuses become `ApiError::Status`
//! before any body parse is attempted.

pub mod types;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use types::{
    CockpitSnapshot, CommandResponse, GraphData, LogTail, MemoryResult, PendingRun, Persona,
    RunDiffResponse, RunHistoryEntry, Source, Tool, VisionFrame,
};

/// Errors from control-plane API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

/// Client for the control-plane API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://127.0.0.1:8333`).
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}/api/{path}", self.base_url);
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ApiError> {
        let url = format!("{}/api/{path}", self.base_url);
        let response = self.http.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(ApiError::Status { status, body });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("failed to parse response: {e}")))
    }

    /// Events, agent-to-agent traffic, and metrics in one snapshot.
    pub async fn cockpit(&self) -> Result<CockpitSnapshot, ApiError> {
        self.get_json("cockpit").await
    }

    /// The backend's registered tool inventory.
    pub async fn tools(&self) -> Result<Vec<Tool>, ApiError> {
        self.get_json("tools").await
    }

    /// Indexed retrieval sources.
    pub async fn rag_sources(&self) -> Result<Vec<Source>, ApiError> {
        self.get_json("rag_sources").await
    }

    /// The backend's persisted configuration, verbatim.
    pub async fn config(&self) -> Result<Value, ApiError> {
        self.get_json("config").await
    }

    /// Push configuration updates. Callers validate JSON before calling.
    pub async fn save_config(&self, updates: &Value) -> Result<Value, ApiError> {
        self.post_json("config", &json!({ "updates": updates })).await
    }

    /// Recent backend log lines.
    pub async fn log_tail(&self) -> Result<LogTail, ApiError> {
        self.get_json("log_tail").await
    }

    /// Latest vision frame, if the VLA agent has produced one.
    pub async fn vla_latest(&self) -> Result<VisionFrame, ApiError> {
        self.get_json("vla_latest").await
    }

    /// The agent relationship graph.
    pub async fn graph(&self) -> Result<GraphData, ApiError> {
        self.get_json("graph").await
    }

    /// Persona catalog. Replaces the built-in defaults only when non-empty.
    pub async fn roles(&self) -> Result<Vec<Persona>, ApiError> {
        self.get_json("roles").await
    }

    /// Runs awaiting approval.
    pub async fn pending_runs(&self) -> Result<Vec<PendingRun>, ApiError> {
        self.get_json("pending_runs").await
    }

    /// Run history, newest first.
    pub async fn runs(&self) -> Result<Vec<RunHistoryEntry>, ApiError> {
        self.get_json("runs").await
    }

    /// Send one free-form command line to the backend.
    pub async fn send_command(&self, command: &str) -> Result<CommandResponse, ApiError> {
        self.post_json("command", &json!({ "command": command })).await
    }

    /// Approve a pending run.
    pub async fn approve(&self, run_id: &str) -> Result<Value, ApiError> {
        self.post_json("approve", &json!({ "run_id": run_id })).await
    }

    /// Approve the next gated step of the active run.
    pub async fn approve_step(&self) -> Result<Value, ApiError> {
        self.post_json("approve_step", &json!({})).await
    }

    /// Search agent memory.
    pub async fn memory_search(&self, query: &str) -> Result<Vec<MemoryResult>, ApiError> {
        self.post_json("memory_search", &json!({ "query": query })).await
    }

    /// Diff two runs. A non-success status is an error the caller must
    /// surface — distinct from an empty diff.
    pub async fn run_diff(&self, run_a: &str, run_b: &str) -> Result<String, ApiError> {
        let url = format!(
            "{}/api/run_diff?run_a={}&run_b={}",
            self.base_url,
            urlencode(run_a),
            urlencode(run_b)
        );
        let response = self.http.get(&url).send().await?;
        let diff: RunDiffResponse = Self::decode(response).await?;
        Ok(diff.diff)
    }
}

/// Minimal percent-encoding for query values. Run ids are short tokens,
/// but spaces and reserved characters still get escaped.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
