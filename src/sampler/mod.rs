//! Periodic tension recording.
//!
//! A [`Sampler`] appends the experiment's current tension to its measurement
//! series on every tick of a [`Scheduler`]. The experiment is shared behind a
//! mutex so sampling and caller mutations are serialized: a sample sees the
//! state either before or after a dose or randomization, never during.
//!
//! ```text
//!   caller ──dose/drain/randomize──┐
//!                                  ▼
//!                     Arc<Mutex<ExperimentState>>
//!                                  ▲
//!   Scheduler tick ──record_sample─┘
//! ```

mod recorder;
mod scheduler;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::state::ExperimentState;

pub use recorder::Sampler;
pub use scheduler::{ManualScheduler, RepeatingTask, Scheduler, ThreadScheduler, TimerHandle};

/// Experiment shared between the caller and the sampler
pub type SharedExperiment = Arc<Mutex<ExperimentState>>;

/// Wrap an experiment for sharing with a sampler
pub fn share(state: ExperimentState) -> SharedExperiment {
    Arc::new(Mutex::new(state))
}

/// Lock the shared experiment.
///
/// A panic while the lock was held cannot leave a half-applied transition,
/// since every mutator commits at its end, so a poisoned lock is recovered.
pub fn lock_experiment(experiment: &SharedExperiment) -> MutexGuard<'_, ExperimentState> {
    experiment.lock().unwrap_or_else(PoisonError::into_inner)
}
