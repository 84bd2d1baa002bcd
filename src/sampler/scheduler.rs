//! Cancellable repeating timers.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Work run on every tick
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// Handle to a scheduled repeating task
pub trait TimerHandle: Send {
    /// Stop the repetition. Once this returns, the task will not run again.
    fn cancel(&mut self);

    /// Whether the task is still scheduled
    fn is_active(&self) -> bool;
}

/// Runs a task repeatedly at a fixed period until cancelled
pub trait Scheduler: Send {
    fn schedule_repeating(
        &self,
        period: Duration,
        task: RepeatingTask,
    ) -> io::Result<Box<dyn TimerHandle>>;
}

/// Real-time scheduler backed by one worker thread per task.
///
/// The worker waits on a stop channel until the next tick deadline, so a
/// cancel wakes it immediately instead of after the current sleep. Deadlines
/// advance in whole periods from the start time, so time spent inside the
/// task does not accumulate as drift.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn schedule_repeating(
        &self,
        period: Duration,
        mut task: RepeatingTask,
    ) -> io::Result<Box<dyn TimerHandle>> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let worker = thread::Builder::new()
            .name("tension-sampler".to_string())
            .spawn(move || {
                let mut deadline = Instant::now() + period;
                loop {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {
                            task();
                            deadline = next_deadline(deadline, period, Instant::now());
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Box::new(ThreadTimer {
            stop: Some(stop_tx),
            worker: Some(worker),
        }))
    }
}

/// First tick deadline after `now` on the grid `previous + k * period`.
/// Ticks missed while the task overran are skipped, not fired in a burst.
fn next_deadline(previous: Instant, period: Duration, now: Instant) -> Instant {
    if period.is_zero() {
        return now;
    }
    let mut next = previous + period;
    while next <= now {
        next += period;
    }
    next
}

struct ThreadTimer {
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl TimerHandle for ThreadTimer {
    fn cancel(&mut self) {
        if let Some(stop) = self.stop.take() {
            // The worker may already have exited; nothing to stop then.
            let _ = stop.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Sampler worker panicked");
            }
        }
    }

    fn is_active(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler driven by explicit [`advance`](ManualScheduler::advance) calls.
///
/// Each tick runs every active task once; the period is ignored. Clones share
/// the same task list, so a caller can keep one clone and hand another to a
/// sampler.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tasks: Arc<Mutex<Vec<ManualTask>>>,
}

struct ManualTask {
    active: Arc<AtomicBool>,
    task: RepeatingTask,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every active task `ticks` times
    pub fn advance(&self, ticks: usize) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for _ in 0..ticks {
            tasks.retain(|t| t.active.load(Ordering::SeqCst));
            for t in tasks.iter_mut() {
                (t.task)();
            }
        }
    }

    /// Number of tasks still scheduled
    pub fn active_tasks(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|t| t.active.load(Ordering::SeqCst))
            .count()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(
        &self,
        _period: Duration,
        task: RepeatingTask,
    ) -> io::Result<Box<dyn TimerHandle>> {
        let active = Arc::new(AtomicBool::new(true));
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ManualTask {
                active: Arc::clone(&active),
                task,
            });
        Ok(Box::new(ManualTimer { active }))
    }
}

struct ManualTimer {
    active: Arc<AtomicBool>,
}

impl TimerHandle for ManualTimer {
    fn cancel(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_task(count: &Arc<AtomicUsize>) -> RepeatingTask {
        let count = Arc::clone(count);
        Box::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_manual_ticks_and_cancel() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let mut timer = scheduler
            .schedule_repeating(Duration::from_millis(500), counter_task(&count))
            .unwrap();

        scheduler.advance(3);
        assert_eq!(count.load(Ordering::SeqCst), 3);

        timer.cancel();
        assert!(!timer.is_active());
        scheduler.advance(5);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.active_tasks(), 0);
    }

    #[test]
    fn test_deadlines_stay_on_period_grid() {
        let start = Instant::now();
        let period = Duration::from_millis(10);

        // Task finished early: next tick is one period after the last
        let next = next_deadline(start, period, start + Duration::from_millis(4));
        assert_eq!(next, start + period);

        // Task overran past two deadlines: skip to the next grid point
        let next = next_deadline(start, period, start + Duration::from_millis(27));
        assert_eq!(next, start + Duration::from_millis(30));

        // Landing exactly on a deadline moves past it
        let next = next_deadline(start, period, start + period);
        assert_eq!(next, start + Duration::from_millis(20));
    }

    #[test]
    fn test_zero_period_deadline_is_now() {
        let start = Instant::now();
        let now = start + Duration::from_millis(3);
        assert_eq!(next_deadline(start, Duration::ZERO, now), now);
    }

    #[test]
    fn test_thread_timer_runs_and_stops() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut timer = ThreadScheduler
            .schedule_repeating(Duration::from_millis(5), counter_task(&count))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        timer.cancel();
        let after_cancel = count.load(Ordering::SeqCst);
        assert!(after_cancel >= 3, "only {} ticks before deadline", after_cancel);
        assert!(!timer.is_active());

        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }
}
