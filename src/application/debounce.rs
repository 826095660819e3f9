//! Debounced echo of a rapidly changing value.
//!
//! [`Debounced`] owns a background task that forwards the most recent input
//! once it has been stable for the configured delay. Intermediate values are
//! never queued: each new input restarts the quiet-period timer.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default quiet period for search text.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

pub struct Debounced<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
    worker: JoinHandle<()>,
}

impl<T> Debounced<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Must be called from within a tokio runtime.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, mut input_rx) = watch::channel(initial.clone());
        let (output_tx, output) = watch::channel(initial);

        let worker = tokio::spawn(async move {
            while input_rx.changed().await.is_ok() {
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => break,
                        changed = input_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                    }
                }
                let latest = input_rx.borrow_and_update().clone();
                output_tx.send_if_modified(|current| {
                    if *current == latest {
                        false
                    } else {
                        *current = latest;
                        true
                    }
                });
            }
        });

        Self {
            input,
            output,
            worker,
        }
    }

    /// Feed a new input value, restarting the quiet period.
    pub fn set(&self, value: T) {
        self.input.send_replace(value);
    }

    /// The latest input, whether or not it has settled.
    pub fn pending(&self) -> T {
        self.input.borrow().clone()
    }

    /// The settled value.
    pub fn value(&self) -> T {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    /// Wait for the next settled value.
    pub async fn changed(&mut self) -> Option<T> {
        self.output.changed().await.ok()?;
        Some(self.output.borrow_and_update().clone())
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        // A pending emission is discarded with the worker.
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn collect(mut rx: watch::Receiver<String>) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let value = rx.borrow_and_update().clone();
                sink.lock().unwrap().push(value);
            }
        });
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_emit_only_last() {
        let debounced = Debounced::new(String::new(), Duration::from_millis(300));
        let seen = collect(debounced.subscribe());

        debounced.set("a".into());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debounced.set("ab".into());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debounced.set("abc".into());
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*seen.lock().unwrap(), vec!["abc".to_string()]);
        assert_eq!(debounced.value(), "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_changes_all_emitted() {
        let debounced = Debounced::new(String::new(), Duration::from_millis(300));
        let seen = collect(debounced.subscribe());

        debounced.set("s3".into());
        tokio::time::sleep(Duration::from_millis(400)).await;
        debounced.set("iam".into());
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*seen.lock().unwrap(), vec!["s3".to_string(), "iam".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_lags_until_quiet_period() {
        let debounced = Debounced::new(String::new(), Duration::from_millis(300));
        debounced.set("kms".into());
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(debounced.value(), "");
        assert_eq!(debounced.pending(), "kms");
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(debounced.value(), "kms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_update() {
        let debounced = Debounced::new(String::new(), Duration::from_millis(300));
        let seen = collect(debounced.subscribe());

        debounced.set("never".into());
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(debounced);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(seen.lock().unwrap().is_empty());
    }
}
