//! Event publishing boundary: grade and analytics facts leave the widget here.
//!
//! Publishing is fire-and-forget from the grading engine's perspective; a
//! failing transport never changes a grading result. The publisher is an
//! injected capability so grading logic stays decoupled from the host bus.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Map, Value};
use tracing::debug;

pub const GRADE_EVENT: &str = "grade";
pub const PROBLEM_CHECK_EVENT: &str = "problem_check";

/// One-way sink for structured facts bound for the host runtime.
pub trait EventPublisher {
    fn publish(&self, event_type: &str, payload: Value);
}

/// Publisher that drops everything; for hosts without an event bus.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPublisher;

impl EventPublisher for NullPublisher {
    fn publish(&self, event_type: &str, payload: Value) {
        debug!(target: "widget", %event_type, %payload, "Event dropped (no bus configured)");
    }
}

/// Publisher that records events in memory. Handy for tests and for hosts
/// that batch-forward facts after the handler returns.
#[derive(Clone, Debug, Default)]
pub struct RecordingPublisher {
    pub events: Rc<RefCell<Vec<(String, Value)>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(t, _)| t.clone()).collect()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event_type: &str, payload: Value) {
        self.events
            .borrow_mut()
            .push((event_type.to_string(), payload));
    }
}

/// Grade fact emitted on every accepted submission.
pub fn grade_payload(score: f64) -> Value {
    json!({ "value": score, "max_value": 1.0 })
}

/// Problem-check fact emitted alongside the grade.
pub fn problem_check_payload(score: f64) -> Value {
    json!({ "grade": score, "max_grade": 1.0 })
}

/// Stamp a caller-supplied event payload with the identifiers the host
/// analytics pipeline expects.
pub fn enrich_custom_payload(
    mut payload: Map<String, Value>,
    user_id: &str,
    component_id: &str,
) -> Value {
    payload.insert("user_id".into(), Value::String(user_id.to_string()));
    payload.insert(
        "component_id".into(),
        Value::String(component_id.to_string()),
    );
    Value::Object(payload)
}
