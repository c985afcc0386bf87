use std::sync::Arc;

use log::{error, info};
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

use crate::client::services::backend::Backend;

/// Runs exactly one backend fetch on the blocking pool and resolves with its
/// result. Progress lines go to `progress`; the sender is dropped when the
/// call returns, which closes the channel. A panic inside the backend is
/// reported as a failed fetch.
pub async fn run(backend: Arc<dyn Backend>, progress: UnboundedSender<String>) -> Option<Value> {
    info!("[WORKER] Fetch started");
    match tokio::task::spawn_blocking(move || backend.get_data_with_progress(&progress)).await {
        Ok(result) => {
            info!("[WORKER] Fetch finished (data: {})", result.is_some());
            result
        }
        Err(e) => {
            error!("[WORKER] Backend call aborted: {}", e);
            None
        }
    }
}

/// Receiving end of a fetch's progress channel, shared so it can ride along
/// in a `Message` between polls.
pub type ProgressFeed = Arc<Mutex<UnboundedReceiver<String>>>;

/// Waits for the next progress line; `None` once the fetch has returned.
pub async fn next_progress(feed: ProgressFeed) -> Option<(String, ProgressFeed)> {
    let line = feed.lock().await.recv().await?;
    Some((line, feed))
}
