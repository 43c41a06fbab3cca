//! Handle for a tip being generated on a worker task.
//!
//! The presentation layer decides how to show progress: poll with
//! [`PendingTip::try_take`], await with [`PendingTip::wait`], or let
//! [`PendingTip::wait_with_progress`] call back once a threshold passes.

use std::time::Duration;

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};
use tracing::warn;

enum State {
    Running(JoinHandle<String>),
    Done(String),
}

/// A tip generation in flight.
///
/// Whatever happens to the worker (panic, abort), the handle resolves to a
/// non-empty tip: the precomputed local one.
pub struct PendingTip {
    state: State,
    fallback: String,
}

impl PendingTip {
    pub(crate) fn new(handle: JoinHandle<String>, fallback: String) -> Self {
        Self {
            state: State::Running(handle),
            fallback,
        }
    }

    fn resolve(&self, joined: Result<String, JoinError>) -> String {
        match joined {
            Ok(tip) => tip,
            Err(err) => {
                warn!(error = %err, "tip worker did not complete; using local tip");
                self.fallback.clone()
            }
        }
    }

    /// Whether the result is available without waiting.
    pub fn is_finished(&self) -> bool {
        match &self.state {
            State::Running(handle) => handle.is_finished(),
            State::Done(_) => true,
        }
    }

    /// Non-blocking poll. Returns the tip once the worker has finished; the
    /// handle keeps it for later calls.
    pub fn try_take(&mut self) -> Option<String> {
        if let State::Running(handle) = &mut self.state {
            if !handle.is_finished() {
                return None;
            }
            let joined = handle.now_or_never()?;
            let tip = self.resolve(joined);
            self.state = State::Done(tip);
        }

        match &self.state {
            State::Done(tip) => Some(tip.clone()),
            State::Running(_) => None,
        }
    }

    /// Wait for the tip.
    pub async fn wait(self) -> String {
        match self.state {
            State::Done(tip) => tip,
            State::Running(handle) => {
                let joined = handle.await;
                match joined {
                    Ok(tip) => tip,
                    Err(err) => {
                        warn!(error = %err, "tip worker did not complete; using local tip");
                        self.fallback
                    }
                }
            }
        }
    }

    /// Wait for the tip, calling `on_slow` once if it is not ready within
    /// `threshold`. There is no upper bound on the wait itself.
    pub async fn wait_with_progress<F>(mut self, threshold: Duration, on_slow: F) -> String
    where
        F: FnOnce(),
    {
        if let State::Running(handle) = &mut self.state {
            match tokio::time::timeout(threshold, handle).await {
                Ok(joined) => {
                    let tip = self.resolve(joined);
                    self.state = State::Done(tip);
                }
                Err(_) => on_slow(),
            }
        }
        self.wait().await
    }

    /// Abort the worker and return the local tip instead.
    pub fn cancel(self) -> String {
        match self.state {
            State::Done(tip) => tip,
            State::Running(handle) => {
                handle.abort();
                self.fallback
            }
        }
    }
}

impl std::fmt::Debug for PendingTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTip")
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn slow_task(delay: Duration, text: &'static str) -> JoinHandle<String> {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            text.to_string()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn try_take_before_and_after_completion() {
        let mut pending = PendingTip::new(slow_task(Duration::from_secs(2), "done"), "local".into());
        assert!(!pending.is_finished());
        assert_eq!(pending.try_take(), None);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(pending.is_finished());
        assert_eq!(pending.try_take().as_deref(), Some("done"));
        // The result stays available.
        assert_eq!(pending.try_take().as_deref(), Some("done"));
        assert_eq!(pending.wait().await, "done");
    }

    #[tokio::test(start_paused = true)]
    async fn fast_result_skips_progress_callback() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let pending = PendingTip::new(slow_task(Duration::from_millis(50), "quick"), "local".into());

        let tip = pending
            .wait_with_progress(Duration::from_millis(300), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(tip, "quick");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_result_triggers_progress_callback_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let pending = PendingTip::new(slow_task(Duration::from_secs(5), "slow"), "local".into());

        let tip = pending
            .wait_with_progress(Duration::from_millis(300), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(tip, "slow");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_worker_yields_fallback() {
        let handle: JoinHandle<String> = tokio::spawn(async { panic!("worker blew up") });
        let pending = PendingTip::new(handle, "local tip".into());
        assert_eq!(pending.wait().await, "local tip");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_returns_fallback() {
        let pending = PendingTip::new(slow_task(Duration::from_secs(60), "late"), "local tip".into());
        assert_eq!(pending.cancel(), "local tip");
    }
}
