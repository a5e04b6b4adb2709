//! Deadline enforcement for calls into external collaborators.

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Awaits `fut`, failing with [`AppError::Timeout`] once `limit` elapses.
///
/// With `limit = None` the future runs unbounded. On timeout the inner
/// future is dropped, which aborts the underlying store call.
pub async fn with_deadline<T, F>(limit: Option<Duration>, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| AppError::Timeout(limit))?,
        None => fut.await,
    }
}
