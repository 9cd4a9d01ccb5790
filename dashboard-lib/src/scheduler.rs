use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Shortest period a timer will run at; tokio intervals reject zero.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Repeating timers owned by one dashboard instance.
///
/// Jobs run on the timer task itself, so they must be quick and
/// non-blocking; anything that awaits I/O should spawn its own task. Timers
/// stop when [`Scheduler::cancel`] is called or the scheduler is dropped.
#[derive(Default)]
pub struct Scheduler {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` every `period`, first at `now + period`. Periods below
    /// [`MIN_PERIOD`] are raised to it.
    pub fn every<F>(&mut self, period: Duration, mut job: F)
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => job(),
                }
            }
        });
        self.tasks.push(handle);
    }

    /// Stop every timer. Safe to call more than once.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
