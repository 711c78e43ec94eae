//! Trailing-edge debouncing shared by every list view.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Runs only the last of a burst of calls, `delay` after that call.
///
/// Each [`Debouncer::call`] replaces the pending timer. Once a timer fires, the
/// action runs on its own task, so later calls never cancel work that already
/// started.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `action`, dropping whatever was scheduled before.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action());
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Drops the scheduled action, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.get_mut().take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter_action(
        counter: &Arc<AtomicUsize>,
        value: usize,
    ) -> impl FnOnce() -> std::future::Ready<()> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.store(value, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_call_in_burst_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let seen = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        for value in 1..=3 {
            let seen = Arc::clone(&seen);
            let runs = Arc::clone(&runs);
            debouncer.call(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                seen.store(value, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_runs_before_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let seen = Arc::new(AtomicUsize::new(0));

        debouncer.call(counter_action(&seen, 7));
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_action() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let seen = Arc::new(AtomicUsize::new(0));

        debouncer.call(counter_action(&seen, 1));
        assert!(debouncer.cancel());
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(!debouncer.cancel());
    }
}
