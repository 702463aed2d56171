//! Submit-and-Compare · Exercise Widget Core
//!
//! - Parses the authored content document (XML) into prompt/explanation/hints
//! - Gates submissions on attempt allowance and due date
//! - Grades submissions (presence-based pass/fail) and publishes grade facts
//! - Exposes a transport-agnostic JSON request/response surface for hosts
//!
//! Important env variables:
//!   EXERCISE_CONFIG_PATH : path to TOML config (authoring metadata + content document)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"
//!
//! The host platform owns rendering, persistence of `ExerciseState` and the
//! event transport; this crate owns the attempt-and-grading state machine.

pub mod telemetry;
pub mod util;
pub mod domain;
pub mod config;
pub mod content;
pub mod events;
pub mod protocol;
pub mod grading;
pub mod presenter;
pub mod exercise;

pub use config::{load_exercise_config_from_env, AuthoringUpdate, ExerciseConfig};
pub use content::{ContentDocument, ParseError};
pub use domain::{is_past_due, ExerciseState, SubmitAction};
pub use events::{EventPublisher, NullPublisher, RecordingPublisher};
pub use exercise::Exercise;
pub use protocol::{ProtocolError, ViewContext, WidgetRequest, WidgetResponse};
