//! The sampler handle.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use super::scheduler::{Scheduler, ThreadScheduler, TimerHandle};
use super::{lock_experiment, SharedExperiment};

/// Records the current tension into the experiment's measurement series at
/// a fixed period while running.
///
/// At most one recording task exists per sampler. Pausing keeps every sample
/// taken so far, and resuming continues from the current series length.
/// Do not hold the experiment lock while calling [`pause`](Self::pause) or
/// [`stop`](Self::stop), or while dropping the sampler: cancelling waits for
/// an in-flight sample.
pub struct Sampler {
    experiment: SharedExperiment,
    scheduler: Box<dyn Scheduler>,
    period: Duration,
    timer: Option<Box<dyn TimerHandle>>,
}

impl Sampler {
    pub fn new(
        experiment: SharedExperiment,
        scheduler: impl Scheduler + 'static,
        period: Duration,
    ) -> Self {
        Self {
            experiment,
            scheduler: Box::new(scheduler),
            period,
            timer: None,
        }
    }

    /// Real-time sampler using the experiment's configured sample period
    pub fn with_thread_scheduler(experiment: SharedExperiment) -> Self {
        let period = lock_experiment(&experiment).params().recording.sample_period();
        Self::new(experiment, ThreadScheduler, period)
    }

    /// Begin recording. Returns `Ok(false)` without scheduling anything if
    /// already running.
    pub fn start(&mut self) -> io::Result<bool> {
        if self.is_running() {
            return Ok(false);
        }
        let experiment = Arc::clone(&self.experiment);
        let timer = self.scheduler.schedule_repeating(
            self.period,
            Box::new(move || {
                lock_experiment(&experiment).record_sample();
            }),
        )?;
        self.timer = Some(timer);
        log::info!("Recording started ({} ms period)", self.period.as_millis());
        Ok(true)
    }

    /// Same as [`start`](Self::start)
    pub fn resume(&mut self) -> io::Result<bool> {
        self.start()
    }

    /// Cancel the recording task. Returns whether one was running.
    pub fn pause(&mut self) -> bool {
        match self.timer.take() {
            Some(mut timer) => {
                let was_active = timer.is_active();
                timer.cancel();
                log::info!("Recording paused");
                was_active
            }
            None => false,
        }
    }

    /// Cancel the recording task. Identical in effect to [`pause`](Self::pause).
    pub fn stop(&mut self) -> bool {
        let was_running = self.pause();
        if was_running {
            log::info!("Recording stopped");
        }
        was_running
    }

    /// Clear recorded samples back to the seed points. Does not affect
    /// whether the sampler is running.
    pub fn reset_series(&self) {
        lock_experiment(&self.experiment).reset_series();
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| t.is_active())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn experiment(&self) -> &SharedExperiment {
        &self.experiment
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExperimentParameters;
    use crate::sampler::{share, ManualScheduler};
    use crate::state::ExperimentState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shared_experiment() -> SharedExperiment {
        let mut rng = StdRng::seed_from_u64(11);
        share(ExperimentState::new(ExperimentParameters::default(), &mut rng).unwrap())
    }

    #[test]
    fn test_second_start_is_noop() {
        let scheduler = ManualScheduler::new();
        let mut sampler = Sampler::new(shared_experiment(), scheduler.clone(), Duration::from_millis(500));
        assert!(sampler.start().unwrap());
        assert!(!sampler.start().unwrap());
        assert_eq!(scheduler.active_tasks(), 1);

        scheduler.advance(2);
        assert_eq!(lock_experiment(sampler.experiment()).series().samples().len(), 2);
    }

    #[test]
    fn test_pause_when_idle() {
        let mut sampler = Sampler::new(shared_experiment(), ManualScheduler::new(), Duration::from_millis(500));
        assert!(!sampler.pause());
        assert!(!sampler.is_running());
    }

    #[test]
    fn test_drop_cancels() {
        let scheduler = ManualScheduler::new();
        {
            let mut sampler =
                Sampler::new(shared_experiment(), scheduler.clone(), Duration::from_millis(500));
            sampler.start().unwrap();
        }
        assert_eq!(scheduler.active_tasks(), 0);
    }
}
