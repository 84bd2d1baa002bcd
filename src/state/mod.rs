//! State management for an organ bath session.
//!
//! Contains the experiment session, its hidden answer key, and the recorded
//! tension series.

mod answer;
mod experiment;
mod series;

pub use answer::{AnswerObserver, HiddenAnswer};
pub use experiment::ExperimentState;
pub use series::{MeasurementSeries, SeriesPoint, SEED_POINTS};
