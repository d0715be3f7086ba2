//! Trailing-edge debounce for UI event sources such as search input.

use std::time::Duration;

use tokio::sync::mpsc;

/// Default quiet period for search keystrokes.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Forwards only the last value of each burst from `input`.
///
/// A value is emitted once `input` has been quiet for `interval`. When
/// `input` closes, any pending value is flushed and the returned receiver
/// closes after it. Must be called inside a tokio runtime.
pub fn debounce<T>(mut input: mpsc::Receiver<T>, interval: Duration) -> mpsc::Receiver<T>
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            if pending.is_none() {
                match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                }
                continue;
            }

            match tokio::time::timeout(interval, input.recv()).await {
                Ok(Some(value)) => pending = Some(value),
                Ok(None) => break,
                Err(_elapsed) => {
                    if let Some(value) = pending.take() {
                        if tx.send(value).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }

        if let Some(value) = pending.take() {
            let _ = tx.send(value).await;
        }
    });
    rx
}
