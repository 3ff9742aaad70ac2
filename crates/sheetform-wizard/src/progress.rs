//! Cosmetic upload progress.
//!
//! The reporter only animates a percentage while a file is being parsed. It
//! never decides when parsing is done; the ingest future does.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default time between progress increments.
pub const PROGRESS_TICK: Duration = Duration::from_millis(100);

/// Default increment per tick, in percent.
pub const PROGRESS_STEP: u8 = 5;

/// The animation holds here until the upload completes.
pub const PROGRESS_CEILING: u8 = 95;

/// Background task publishing a rising percentage on a watch channel.
///
/// Dropping the reporter aborts the task, so any owner that discards it
/// (close, failure, a new upload) also stops the animation.
#[derive(Debug)]
pub struct ProgressReporter {
    receiver: watch::Receiver<u8>,
    task: JoinHandle<()>,
}

impl ProgressReporter {
    /// Starts the default animation. Must be called inside a tokio runtime.
    pub fn spawn() -> Self {
        Self::with_schedule(PROGRESS_TICK, PROGRESS_STEP)
    }

    pub fn with_schedule(tick: Duration, step: u8) -> Self {
        let (sender, receiver) = watch::channel(0u8);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut at_ceiling = false;
                sender.send_modify(|percent| {
                    *percent = percent.saturating_add(step).min(PROGRESS_CEILING);
                    at_ceiling = *percent >= PROGRESS_CEILING;
                });
                if at_ceiling || sender.is_closed() {
                    break;
                }
            }
        });
        Self { receiver, task }
    }

    /// Current percentage, 0 to [`PROGRESS_CEILING`].
    pub fn percentage(&self) -> u8 {
        *self.receiver.borrow()
    }

    /// A receiver that observes every published percentage.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.receiver.clone()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_progress_rises_and_stops_at_ceiling() {
        let reporter = ProgressReporter::with_schedule(Duration::from_millis(1), 40);
        let mut receiver = reporter.subscribe();
        let reached = tokio::time::timeout(Duration::from_secs(5), async {
            receiver.wait_for(|percent| *percent >= PROGRESS_CEILING).await.map(|p| *p)
        })
        .await;
        assert_eq!(reached.ok().and_then(Result::ok), Some(PROGRESS_CEILING));
        assert_eq!(reporter.percentage(), PROGRESS_CEILING);
    }

    #[tokio::test]
    async fn test_drop_stops_publishing() {
        let reporter = ProgressReporter::with_schedule(Duration::from_millis(1), 1);
        let mut receiver = reporter.subscribe();
        drop(reporter);
        // Once the task is aborted its sender is gone and `changed` errors out.
        let finished = tokio::time::timeout(Duration::from_secs(5), async {
            while receiver.changed().await.is_ok() {}
        })
        .await;
        assert!(finished.is_ok());
        assert!(*receiver.borrow() < PROGRESS_CEILING);
    }
}
