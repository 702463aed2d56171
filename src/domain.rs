//! Domain models: learner state, the submit-action discriminator, and
//! due-date gating.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Which kind of handler invocation carried the answer.
///
/// Only `Submit` consumes an attempt; anything else reusing the same channel
/// (re-render triggers, hint-side saves) stores the answer without spending
/// the learner's allowance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitAction {
    Submit,
    Other,
}

/// Per-learner, per-instance state persisted by the host platform across
/// submissions. Mutated only by the grading engine's accept path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseState {
    /// Empty until the first submission.
    #[serde(default)]
    pub student_answer: String,
    #[serde(default)]
    pub attempts_used: u32,
    /// 0 means unlimited attempts.
    #[serde(default)]
    pub attempts_allowed: u32,
    /// Binary pass/fail; 0.0 until graded.
    #[serde(default)]
    pub score: f64,
    /// Points multiplier for display only; authoring-set.
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub grace_seconds: u32,
}

fn default_weight() -> u32 {
    1
}

impl Default for ExerciseState {
    fn default() -> Self {
        Self {
            student_answer: String::new(),
            attempts_used: 0,
            attempts_allowed: 0,
            score: 0.0,
            weight: default_weight(),
            due_at: None,
            grace_seconds: 0,
        }
    }
}

/// True once `now` has passed the due date plus the grace period.
/// No due date means never past due.
pub fn is_past_due(now: DateTime<Utc>, due_at: Option<DateTime<Utc>>, grace_seconds: u32) -> bool {
    match due_at {
        Some(due) => now > due + Duration::seconds(i64::from(grace_seconds)),
        None => false,
    }
}

impl ExerciseState {
    pub fn past_due(&self, now: DateTime<Utc>) -> bool {
        is_past_due(now, self.due_at, self.grace_seconds)
    }

    /// Submission is allowed while the problem is open and attempts remain.
    pub fn can_submit(&self, now: DateTime<Utc>) -> bool {
        if self.past_due(now) {
            return false;
        }
        self.attempts_allowed == 0 || self.attempts_used < self.attempts_allowed
    }
}
