use rand::Rng;
use std::future::Future;
use std::time::Duration;
use crate::error::{Error, Result};

pub async fn sleep_with_jitter(base_ms: u64, jitter_ms: u64) {
    let jitter = rand::rng().random_range(0..=jitter_ms);
    tokio::time::sleep(Duration::from_millis(base_ms + jitter)).await;
}

/// Bounds a fallible future; running out of time yields `Error::Timeout`.
pub async fn with_timeout<T, F>(duration: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| Error::Timeout(duration))?
}
