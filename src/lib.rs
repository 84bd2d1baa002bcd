//! Organ Bath Simulator - pharmacology engine for an unknown-drug exercise
//!
//! Agonists and antagonists are dosed into a simulated tissue bath holding
//! several receptors. The tissue's tension is recorded over time, and the
//! user must identify a disguised "Unknown" drug and its concentration.
//!
//! Presentation (menus, charts, dialogs) lives outside this crate and talks
//! to an [`ExperimentState`], usually shared with a [`Sampler`].

// Allow non-snake-case for unit suffixes in names (uM, mL, etc.)
// This follows the project convention of including units in names.
#![allow(non_snake_case)]

pub mod config;
pub mod error;
pub mod export;
pub mod pharmacology;
pub mod sampler;
pub mod state;

pub use config::ExperimentParameters;
pub use error::{ExperimentError, Result};
pub use pharmacology::{
    competitive_occupancy, create_unknown, is_correct, AnswerGuess, AnswerOutcome,
    AnswerVerifier, Drug, DrugRole, Receptor, UnknownDrug, DEFAULT_TOLERANCE, UNKNOWN_NAME,
};
pub use sampler::{
    lock_experiment, share, ManualScheduler, Sampler, Scheduler, SharedExperiment,
    ThreadScheduler, TimerHandle,
};
pub use state::{AnswerObserver, ExperimentState, HiddenAnswer, MeasurementSeries, SeriesPoint};
