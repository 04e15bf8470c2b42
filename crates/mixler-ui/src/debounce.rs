//! Trailing-edge debounce on the tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Wrapped function whose calls are collapsed: only the last call in a burst
/// runs, `delay` after it was made.
pub struct Debounced<A> {
    f: Arc<dyn Fn(A) + Send + Sync>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

pub fn debounce<A, F>(f: F, delay: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced {
        f: Arc::new(f),
        delay,
        pending: Mutex::new(None),
    }
}

impl<A: Send + 'static> Debounced<A> {
    /// Schedule `f(args)`, cancelling any call still waiting.
    ///
    /// Must be called inside a tokio runtime.
    pub fn call(&self, args: A) {
        let f = Arc::clone(&self.f);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f(args);
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Drop the waiting call, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |n| sink.lock().push(n))
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once_with_last_args() {
        let (calls, f) = recorder();
        let debounced = debounce(f, Duration::from_millis(100));

        debounced.call(1);
        tokio::time::sleep(Duration::from_millis(20)).await;
        debounced.call(2);
        tokio::time::sleep(Duration::from_millis(20)).await;
        debounced.call(3);
        assert!(debounced.is_pending());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert!(calls.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(*calls.lock(), vec![3]);
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_fire() {
        let (calls, f) = recorder();
        let debounced = debounce(f, Duration::from_millis(100));

        debounced.call(1);
        tokio::time::sleep(Duration::from_millis(150)).await;
        debounced.call(2);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*calls.lock(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (calls, f) = recorder();
        let debounced = debounce(f, Duration::from_millis(100));

        debounced.call(1);
        debounced.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(calls.lock().is_empty());
    }
}
