//! HTTP handlers

pub mod incidents;

use std::future::Future;
use std::time::Duration;

use itsm_domain::DomainError;
use tracing::warn;

use crate::error::ApiError;

/// Run a service call under the request deadline
///
/// When the deadline elapses the call's future is dropped, which cancels it.
pub(crate) async fn within_deadline<T, F>(deadline: Duration, call: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => {
            warn!(deadline_ms = deadline.as_millis() as u64, "Service call timed out");
            Err(ApiError::Timeout)
        }
    }
}
