//! Grading core: the only code that mutates `ExerciseState`.
//!
//! One synchronous submission cycle:
//!   - gate on the attempt allowance and the due date (rejections are normal
//!     result values, never errors, and leave state untouched)
//!   - store the answer; only a `submit` action consumes an attempt, scores
//!     pass/fail on answer presence (an empty answer is a valid,
//!     attempt-consuming submission that scores 0.0) and publishes the
//!     grade and problem_check facts
//!   - any other action on the same channel saves the answer and nothing else

use chrono::{DateTime, Utc};
use tracing::{debug, error, instrument};

use crate::domain::{ExerciseState, SubmitAction};
use crate::events::{self, EventPublisher};
use crate::presenter;

/// Outcome of one submission cycle, shaped for the widget frontend.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionOutcome {
  pub success: bool,
  pub problem_progress: String,
  pub submit_class: String,
  pub used_attempts_feedback: String,
}

/// Run one submission against the learner's state.
///
/// Only the accept path mutates `state`; a rejected submission returns
/// `success: false` with the feedback projections recomputed but nothing
/// stored. Event publishing is fire-and-forget.
#[instrument(level = "info", skip(state, answer, publisher), fields(action = ?action, answer_len = answer.len()))]
pub fn submit(
  state: &mut ExerciseState,
  answer: &str,
  action: SubmitAction,
  now: DateTime<Utc>,
  publisher: &dyn EventPublisher,
) -> SubmissionOutcome {
  let mut success = false;
  if state.attempts_allowed > 0 && state.attempts_used >= state.attempts_allowed {
    error!(
      target: "submission",
      used = state.attempts_used,
      allowed = state.attempts_allowed,
      "Learner has already used the maximum number of allowed attempts",
    );
  } else if state.past_due(now) {
    debug!(target: "submission", "This problem is past due");
  } else {
    state.student_answer = answer.to_string();
    if action == SubmitAction::Submit {
      state.attempts_used += 1;
      state.score = if state.student_answer.is_empty() { 0.0 } else { 1.0 };
      publisher.publish(events::GRADE_EVENT, events::grade_payload(state.score));
      publisher.publish(
        events::PROBLEM_CHECK_EVENT,
        events::problem_check_payload(state.score),
      );
    }
    success = true;
  }
  SubmissionOutcome {
    success,
    problem_progress: presenter::progress_text(state.score, state.weight),
    submit_class: presenter::submit_class(state, now).to_string(),
    used_attempts_feedback: presenter::used_attempts_feedback(state),
  }
}
