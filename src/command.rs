//! Outbound command encoding — the dispatcher's half of the protocol.
//!
//! Every operator interaction becomes exactly one command line. Complex
//! interactions serialize as `<verb> <json>` so the backend splits verb
//! from payload on the first space. Dispatch is fire-and-forget: one
//! request per invocation, no retry, no de-duplication.

use serde_json::Value;

use crate::api::{ApiClient, ApiError};
use crate::api::types::CommandResponse;

/// An outbound command for the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Free-form operator text, sent verbatim.
    Free(String),
    /// Activation of a directive-supplied action control.
    UiAction(Value),
    /// Submission of a clarification form's entered values.
    SubmitForm(Value),
    /// Switch the active agent persona.
    Profile(String),
    ApproveOnce,
    ApproveAlways,
    ApproveNever,
}

impl Command {
    /// Encode as the single line the backend parses.
    pub fn encode(&self) -> String {
        match self {
            Command::Free(text) => text.clone(),
            Command::UiAction(action) => format!("ui_action {action}"),
            Command::SubmitForm(values) => format!("submit_form {values}"),
            Command::Profile(id) => format!("profile {id}"),
            Command::ApproveOnce => "approve_once".into(),
            Command::ApproveAlways => "approve_always".into(),
            Command::ApproveNever => "approve_never".into(),
        }
    }

    /// Send this command. One request; the outcome is the caller's to
    /// log or ignore.
    pub async fn dispatch(&self, client: &ApiClient) -> Result<CommandResponse, ApiError> {
        client.send_command(&self.encode()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_ui_action() {
        let cmd = Command::UiAction(json!({"type": "select_flight", "id": 2}));
        assert_eq!(cmd.encode(), r#"ui_action {"type":"select_flight","id":2}"#);
    }

    #[test]
    fn encode_form_submission() {
        let cmd = Command::SubmitForm(json!({"city": "Tokyo"}));
        assert_eq!(cmd.encode(), r#"submit_form {"city":"Tokyo"}"#);
    }

    #[test]
    fn encode_profile() {
        assert_eq!(Command::Profile("Coder".into()).encode(), "profile Coder");
    }

    #[test]
    fn encode_approval_verbs() {
        assert_eq!(Command::ApproveOnce.encode(), "approve_once");
        assert_eq!(Command::ApproveAlways.encode(), "approve_always");
        assert_eq!(Command::ApproveNever.encode(), "approve_never");
    }

    #[test]
    fn encode_free_text_verbatim() {
        let cmd = Command::Free("book a flight to Tokyo".into());
        assert_eq!(cmd.encode(), "book a flight to Tokyo");
    }

    #[test]
    fn verb_is_first_token() {
        let cmd = Command::UiAction(json!({"label": "Go"}));
        let encoded = cmd.encode();
        let (verb, rest) = encoded.split_once(' ').unwrap();
        assert_eq!(verb, "ui_action");
        assert!(serde_json::from_str::<Value>(rest).is_ok());
    }
}
