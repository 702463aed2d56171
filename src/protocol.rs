//! Public protocol structs for the in-process handler surface (serde ready).
//! Keep this small and stable so hosts and frontends can evolve independently.
//!
//! Missing or ill-typed required fields are a `ProtocolError` — an
//! integration bug, distinct from a graded rejection (which is a normal
//! `success: false` result). Nothing here is silently defaulted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::SubmitAction;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed request payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("missing event_type in event payload")]
    MissingEventType,
}

/// Requests a host can dispatch into the widget.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetRequest {
    Submit {
        answer: String,
        action: SubmitAction,
    },
    RequestHints,
    PublishEvent {
        /// Open payload; must carry an `event_type` key.
        payload: Map<String, Value>,
    },
}

impl WidgetRequest {
    /// Validate a raw JSON payload at the boundary.
    pub fn from_json(value: Value) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Responses the widget sends back.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetResponse {
    Submitted {
        success: bool,
        problem_progress: String,
        submit_class: String,
        used_attempts_feedback: String,
    },
    Hints {
        hints: Vec<String>,
    },
    EventPublished,
}

/// Context handed to the host's template layer for the student view.
#[derive(Debug, Serialize)]
pub struct ViewContext {
    pub display_name: String,
    pub problem_progress: String,
    pub used_attempts_feedback: String,
    pub submit_class: String,
    pub prompt: String,
    pub student_answer: String,
    pub explanation: String,
    pub your_answer_label: String,
    pub our_answer_label: String,
    pub submit_button_label: String,
    pub is_past_due: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn submit_request_parses_with_action() {
        let req = WidgetRequest::from_json(json!({
            "type": "submit",
            "answer": "finches adapt",
            "action": "submit",
        }))
        .expect("request");
        match req {
            WidgetRequest::Submit { answer, action } => {
                assert_eq!(answer, "finches adapt");
                assert_eq!(action, SubmitAction::Submit);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn non_submit_actions_parse_as_other() {
        let req = WidgetRequest::from_json(json!({
            "type": "submit",
            "answer": "draft",
            "action": "other",
        }))
        .expect("request");
        assert!(matches!(
            req,
            WidgetRequest::Submit { action: SubmitAction::Other, .. }
        ));
    }

    #[test]
    fn missing_answer_is_a_protocol_error() {
        let err = WidgetRequest::from_json(json!({
            "type": "submit",
            "action": "submit",
        }))
        .unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn unknown_action_is_a_protocol_error() {
        // Fail loud rather than coerce to a default that changes grading.
        let err = WidgetRequest::from_json(json!({
            "type": "submit",
            "answer": "x",
            "action": "hint",
        }))
        .unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn responses_serialize_tagged() {
        let out = serde_json::to_value(WidgetResponse::Hints {
            hints: vec!["Hint (1 of 1): a".into()],
        })
        .expect("serialize");
        assert_eq!(out["type"], json!("hints"));
        assert_eq!(out["hints"][0], json!("Hint (1 of 1): a"));
    }
}
