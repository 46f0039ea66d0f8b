use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to a repeating background task
///
/// The task keeps running if the handle is merely dropped; call
/// [`TickerHandle::stop`] to cancel it. Stopping is idempotent.
pub struct TickerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Cancel the repeating task and wait for it to wind down
    pub async fn stop(self) {
        self.token.cancel();
        let _ = self.task.await;
    }
}

/// Spawn a task that runs `tick` once per `period` until cancelled
///
/// The first tick fires after one full period, not immediately. Missed ticks
/// (e.g. after system suspend) are skipped rather than replayed in a burst.
pub fn spawn_ticker<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> TickerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let token = CancellationToken::new();
    let task_token = token.clone();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // interval yields immediately on the first call
        interval.tick().await;

        loop {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!("Ticker {} cancelled", name);
                    break;
                }
                _ = interval.tick() => {
                    tick().await;
                }
            }
        }
    });

    TickerHandle { token, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn ticker_fires_and_stops() {
        let count = Arc::new(AtomicU32::new(0));
        let task_count = Arc::clone(&count);

        let handle = spawn_ticker("test", Duration::from_millis(10), move || {
            let count = Arc::clone(&task_count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.stop().await;

        let fired = count.load(Ordering::SeqCst);
        assert!(fired >= 1, "expected at least one tick, got {}", fired);

        // No further ticks after stop
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), fired);
    }
}
