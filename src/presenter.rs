//! Read-only projections of grading state for display.
//! No mutation here; everything derives from `ExerciseState` + weight.

use chrono::{DateTime, Utc};

use crate::domain::ExerciseState;
use crate::util::{format_points, pluralize};

/// CSS class for the submit button; hides it once submission is closed.
pub fn submit_class(state: &ExerciseState, now: DateTime<Utc>) -> &'static str {
  if state.can_submit(now) { "" } else { "nodisplay" }
}

/// Feedback about the attempt allowance, empty when attempts are unlimited.
pub fn used_attempts_feedback(state: &ExerciseState) -> String {
  if state.attempts_allowed == 0 {
    return String::new();
  }
  // Plural choice follows the allowance, not the used count.
  format!(
    "You have used {} of {} {}",
    state.attempts_used,
    state.attempts_allowed,
    pluralize(state.attempts_allowed, "submission", "submissions"),
  )
}

/// Statement of progress: possible points before grading, earned/possible
/// after, empty when the exercise carries no weight.
pub fn progress_text(score: f64, weight: u32) -> String {
  if weight == 0 {
    String::new()
  } else if score == 0.0 {
    format!("({} {} possible)", weight, pluralize(weight, "point", "points"))
  } else {
    let scaled = score * f64::from(weight);
    format!(
      "({}/{} {})",
      format_points(scaled),
      weight,
      pluralize(weight, "point", "points"),
    )
  }
}
