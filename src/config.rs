//! Loading authoring configuration (display fields + content document) from TOML.
//!
//! See `ExerciseConfig` for the expected schema. Every field has a default so
//! an empty TOML file yields a working sample exercise.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, info};

/// Default content document used when the author has not supplied one yet.
pub const DEFAULT_QUESTION: &str = "\
<submit_and_compare>
  <body>
    <p>Before you begin the simulation, think about the virtual finches.</p>
    <p>What environmental changes might affect their survival?</p>
  </body>
  <explanation>
    <p>Food availability, predators, and climate all shift selection pressure.</p>
  </explanation>
  <demandhint>
    <hint>Think about what the finches eat.</hint>
    <hint>Who eats the finches?</hint>
  </demandhint>
</submit_and_compare>
";

/// Authoring metadata the host supplies per exercise instance.
#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseConfig {
  #[serde(default = "default_display_name")]
  pub display_name: String,
  /// Points multiplier for display.
  #[serde(default = "default_weight")]
  pub weight: u32,
  /// 0 means unlimited attempts.
  #[serde(default)]
  pub max_attempts: u32,
  #[serde(default)]
  pub due_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub grace_seconds: u32,
  /// The authored XML content document.
  #[serde(default = "default_question_string")]
  pub question_string: String,
  #[serde(default = "default_your_answer_label")]
  pub your_answer_label: String,
  #[serde(default = "default_our_answer_label")]
  pub our_answer_label: String,
  #[serde(default = "default_submit_button_label")]
  pub submit_button_label: String,
  /// Stable id for analytics events; a fresh uuid is generated when absent.
  #[serde(default)]
  pub component_id: Option<String>,
}

fn default_display_name() -> String { "Submit and Compare".into() }
fn default_weight() -> u32 { 1 }
fn default_question_string() -> String { DEFAULT_QUESTION.into() }
fn default_your_answer_label() -> String { "Your Answer:".into() }
fn default_our_answer_label() -> String { "Our Answer:".into() }
fn default_submit_button_label() -> String { "Submit".into() }

impl Default for ExerciseConfig {
  fn default() -> Self {
    Self {
      display_name: default_display_name(),
      weight: default_weight(),
      max_attempts: 0,
      due_at: None,
      grace_seconds: 0,
      question_string: default_question_string(),
      your_answer_label: default_your_answer_label(),
      our_answer_label: default_our_answer_label(),
      submit_button_label: default_submit_button_label(),
      component_id: None,
    }
  }
}

/// Field updates accepted from an authoring tool. The new content document
/// must parse before any field is committed; see `Exercise::apply_authoring_update`.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthoringUpdate {
  pub display_name: String,
  pub weight: u32,
  pub max_attempts: u32,
  pub your_answer_label: String,
  pub our_answer_label: String,
  pub submit_button_label: String,
  pub question_string: String,
}

/// Attempt to load `ExerciseConfig` from EXERCISE_CONFIG_PATH.
/// On any parsing/IO error, returns None.
pub fn load_exercise_config_from_env() -> Option<ExerciseConfig> {
  let path = std::env::var("EXERCISE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ExerciseConfig>(&s) {
      Ok(cfg) => {
        info!(target: "widget", %path, "Loaded exercise config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "widget", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "widget", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
