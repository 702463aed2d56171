//! The widget instance: explicit composition of content, learner state,
//! display fields, and the event publisher.
//!
//! One `Exercise` per (learner, instance) pair; the host serializes mutations
//! so at most one request is in flight against an instance at a time. The
//! protocol surface is a single `WidgetRequest` dispatch, transport left to
//! the host.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{AuthoringUpdate, ExerciseConfig};
use crate::content::{ContentDocument, ParseError};
use crate::domain::ExerciseState;
use crate::events::{self, EventPublisher};
use crate::grading;
use crate::presenter;
use crate::protocol::{ProtocolError, ViewContext, WidgetRequest, WidgetResponse};
use crate::util::trunc_for_log;

pub struct Exercise {
    doc: ContentDocument,
    state: ExerciseState,
    display_name: String,
    your_answer_label: String,
    our_answer_label: String,
    submit_button_label: String,
    component_id: String,
    user_id: String,
    publisher: Box<dyn EventPublisher>,
}

impl Exercise {
    /// Build a fresh instance from authoring config. A content document that
    /// fails to parse surfaces the error; there is no fallback content.
    #[instrument(level = "info", skip(config, user_id, publisher), fields(display_name = %config.display_name))]
    pub fn new(
        config: ExerciseConfig,
        user_id: impl Into<String>,
        publisher: Box<dyn EventPublisher>,
    ) -> Result<Self, ParseError> {
        let doc = ContentDocument::parse(&config.question_string)?;
        let component_id = config
            .component_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let state = ExerciseState {
            attempts_allowed: config.max_attempts,
            weight: config.weight,
            due_at: config.due_at,
            grace_seconds: config.grace_seconds,
            ..Default::default()
        };
        info!(target: "widget", %component_id, hints = doc.hints.len(), "Exercise instantiated");
        Ok(Self {
            doc,
            state,
            display_name: config.display_name,
            your_answer_label: config.your_answer_label,
            our_answer_label: config.our_answer_label,
            submit_button_label: config.submit_button_label,
            component_id,
            user_id: user_id.into(),
            publisher,
        })
    }

    /// Restore learner state previously saved by the host.
    pub fn restore_state(&mut self, state: ExerciseState) {
        self.state = state;
    }

    /// Read-only view of the learner state, for the host to persist.
    pub fn state(&self) -> &ExerciseState {
        &self.state
    }

    pub fn document(&self) -> &ContentDocument {
        &self.doc
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Dispatch one typed request. Graded rejections come back as
    /// `success: false` responses; only integration bugs are `Err`.
    #[instrument(level = "info", skip(self, req), fields(component = %self.component_id))]
    pub fn handle(
        &mut self,
        req: WidgetRequest,
        now: DateTime<Utc>,
    ) -> Result<WidgetResponse, ProtocolError> {
        match req {
            WidgetRequest::Submit { answer, action } => {
                debug!(target: "submission", answer = %trunc_for_log(&answer, 120), "Submission received");
                let outcome =
                    grading::submit(&mut self.state, &answer, action, now, self.publisher.as_ref());
                info!(
                    target: "submission",
                    success = outcome.success,
                    score = self.state.score,
                    attempts_used = self.state.attempts_used,
                    "Submission handled",
                );
                Ok(WidgetResponse::Submitted {
                    success: outcome.success,
                    problem_progress: outcome.problem_progress,
                    submit_class: outcome.submit_class,
                    used_attempts_feedback: outcome.used_attempts_feedback,
                })
            }
            WidgetRequest::RequestHints => Ok(WidgetResponse::Hints {
                hints: self.doc.decorated_hints(),
            }),
            WidgetRequest::PublishEvent { mut payload } => {
                let event_type = match payload.remove("event_type") {
                    Some(Value::String(s)) => s,
                    _ => return Err(ProtocolError::MissingEventType),
                };
                let enriched =
                    events::enrich_custom_payload(payload, &self.user_id, &self.component_id);
                self.publisher.publish(&event_type, enriched);
                Ok(WidgetResponse::EventPublished)
            }
        }
    }

    /// Parse a raw JSON payload and dispatch it. Transport-agnostic: the
    /// host decides how an `Err` maps onto its wire format.
    pub fn handle_json(
        &mut self,
        raw: Value,
        now: DateTime<Utc>,
    ) -> Result<WidgetResponse, ProtocolError> {
        let req = WidgetRequest::from_json(raw)?;
        self.handle(req, now)
    }

    /// Context for the host's student-view template.
    pub fn view_context(&self, now: DateTime<Utc>) -> ViewContext {
        ViewContext {
            display_name: self.display_name.clone(),
            problem_progress: presenter::progress_text(self.state.score, self.state.weight),
            used_attempts_feedback: presenter::used_attempts_feedback(&self.state),
            submit_class: presenter::submit_class(&self.state, now).to_string(),
            prompt: self.doc.prompt.clone(),
            student_answer: self.state.student_answer.clone(),
            explanation: self.doc.explanation.clone(),
            your_answer_label: self.your_answer_label.clone(),
            our_answer_label: self.our_answer_label.clone(),
            submit_button_label: self.submit_button_label.clone(),
            is_past_due: self.state.past_due(now),
        }
    }

    /// Apply an authoring-tool update. The new content document must parse
    /// before any field is committed; on failure nothing changes.
    #[instrument(level = "info", skip(self, update), fields(component = %self.component_id))]
    pub fn apply_authoring_update(&mut self, update: AuthoringUpdate) -> Result<(), ParseError> {
        let doc = ContentDocument::parse(&update.question_string)?;
        self.doc = doc;
        self.display_name = update.display_name;
        self.state.weight = update.weight;
        self.state.attempts_allowed = update.max_attempts;
        self.your_answer_label = update.your_answer_label;
        self.our_answer_label = update.our_answer_label;
        self.submit_button_label = update.submit_button_label;
        info!(target: "widget", "Authoring update applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingPublisher;
    use chrono::TimeZone;
    use serde_json::json;

    const QUESTION: &str = "<submit_and_compare>\
        <body>Prompt</body>\
        <explanation>Ours</explanation>\
        <demandhint><hint>a</hint><hint>b</hint></demandhint>\
        </submit_and_compare>";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn exercise(max_attempts: u32) -> (Exercise, RecordingPublisher) {
        let rec = RecordingPublisher::new();
        let config = ExerciseConfig {
            question_string: QUESTION.into(),
            max_attempts,
            component_id: Some("component-1".into()),
            ..Default::default()
        };
        let ex = Exercise::new(config, "learner-7", Box::new(rec.clone())).expect("exercise");
        (ex, rec)
    }

    #[test]
    fn bad_content_fails_construction() {
        let config = ExerciseConfig {
            question_string: "<submit_and_compare><body>p</body></submit_and_compare>".into(),
            ..Default::default()
        };
        let err = Exercise::new(config, "learner-7", Box::new(RecordingPublisher::new()));
        assert!(matches!(err, Err(ParseError::MissingNode("explanation"))));
    }

    #[test]
    fn submit_round_trip_through_json() {
        let (mut ex, rec) = exercise(1);
        let resp = ex
            .handle_json(
                json!({"type": "submit", "answer": "x", "action": "submit"}),
                at(0),
            )
            .expect("response");
        assert_eq!(
            resp,
            WidgetResponse::Submitted {
                success: true,
                problem_progress: "(1/1 point)".into(),
                submit_class: "nodisplay".into(),
                used_attempts_feedback: "You have used 1 of 1 submission".into(),
            }
        );
        assert_eq!(ex.state().attempts_used, 1);
        assert_eq!(rec.event_types(), vec!["grade", "problem_check"]);
    }

    #[test]
    fn second_submit_after_exhaustion_is_rejected() {
        let (mut ex, rec) = exercise(1);
        ex.handle_json(
            json!({"type": "submit", "answer": "x", "action": "submit"}),
            at(0),
        )
        .expect("first");
        let resp = ex
            .handle_json(
                json!({"type": "submit", "answer": "y", "action": "submit"}),
                at(0),
            )
            .expect("second");
        match resp {
            WidgetResponse::Submitted { success, .. } => assert!(!success),
            other => panic!("unexpected response: {other:?}"),
        }
        assert_eq!(ex.state().attempts_used, 1);
        assert_eq!(ex.state().student_answer, "x");
        // Only the first submission published facts.
        assert_eq!(rec.events.borrow().len(), 2);
    }

    #[test]
    fn hints_are_served_decorated_and_stable() {
        let (mut ex, _rec) = exercise(0);
        let first = ex.handle(WidgetRequest::RequestHints, at(0)).expect("hints");
        let second = ex.handle(WidgetRequest::RequestHints, at(0)).expect("hints");
        assert_eq!(first, second);
        assert_eq!(
            first,
            WidgetResponse::Hints {
                hints: vec!["Hint (1 of 2): a".into(), "Hint (2 of 2): b".into()],
            }
        );
    }

    #[test]
    fn custom_events_are_enriched_with_ids() {
        let (mut ex, rec) = exercise(0);
        let resp = ex
            .handle_json(
                json!({"type": "publish_event", "payload": {"event_type": "hint_button", "hint_index": 1}}),
                at(0),
            )
            .expect("published");
        assert_eq!(resp, WidgetResponse::EventPublished);
        let events = rec.events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "hint_button");
        assert_eq!(events[0].1["user_id"], json!("learner-7"));
        assert_eq!(events[0].1["component_id"], json!("component-1"));
        assert_eq!(events[0].1["hint_index"], json!(1));
        assert!(events[0].1.get("event_type").is_none());
    }

    #[test]
    fn missing_event_type_is_a_protocol_error() {
        let (mut ex, rec) = exercise(0);
        let err = ex
            .handle_json(json!({"type": "publish_event", "payload": {"x": 1}}), at(0))
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MissingEventType));
        assert!(rec.events.borrow().is_empty());
    }

    #[test]
    fn view_context_reflects_state_and_document() {
        let (mut ex, _rec) = exercise(2);
        ex.handle_json(
            json!({"type": "submit", "answer": "my answer", "action": "submit"}),
            at(0),
        )
        .expect("submit");
        let ctx = ex.view_context(at(0));
        assert_eq!(ctx.prompt, "Prompt");
        assert_eq!(ctx.explanation, "Ours");
        assert_eq!(ctx.student_answer, "my answer");
        assert_eq!(ctx.problem_progress, "(1/1 point)");
        assert_eq!(ctx.used_attempts_feedback, "You have used 1 of 2 submissions");
        assert_eq!(ctx.submit_class, "");
        assert!(!ctx.is_past_due);
    }

    #[test]
    fn authoring_update_with_bad_xml_changes_nothing() {
        let (mut ex, _rec) = exercise(1);
        let update = AuthoringUpdate {
            display_name: "New".into(),
            weight: 9,
            max_attempts: 9,
            your_answer_label: "Y".into(),
            our_answer_label: "O".into(),
            submit_button_label: "S".into(),
            question_string: "<submit_and_compare><body>p".into(),
        };
        let err = ex.apply_authoring_update(update).unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)));
        assert_eq!(ex.state().weight, 1);
        assert_eq!(ex.state().attempts_allowed, 1);
        assert_eq!(ex.document().prompt, "Prompt");
    }

    #[test]
    fn authoring_update_commits_all_fields() {
        let (mut ex, _rec) = exercise(1);
        let update = AuthoringUpdate {
            display_name: "New".into(),
            weight: 3,
            max_attempts: 5,
            your_answer_label: "Y".into(),
            our_answer_label: "O".into(),
            submit_button_label: "S".into(),
            question_string:
                "<submit_and_compare><body>p2</body><explanation>e2</explanation></submit_and_compare>"
                    .into(),
        };
        ex.apply_authoring_update(update).expect("update");
        assert_eq!(ex.state().weight, 3);
        assert_eq!(ex.state().attempts_allowed, 5);
        assert_eq!(ex.document().prompt, "p2");
        let ctx = ex.view_context(at(0));
        assert_eq!(ctx.display_name, "New");
        assert_eq!(ctx.submit_button_label, "S");
    }

    #[test]
    fn restored_state_feeds_the_next_cycle() {
        let (mut ex, _rec) = exercise(3);
        ex.restore_state(ExerciseState {
            student_answer: "saved".into(),
            attempts_used: 2,
            attempts_allowed: 3,
            score: 1.0,
            ..Default::default()
        });
        let ctx = ex.view_context(at(0));
        assert_eq!(ctx.student_answer, "saved");
        assert_eq!(ctx.used_attempts_feedback, "You have used 2 of 3 submissions");
    }
}
