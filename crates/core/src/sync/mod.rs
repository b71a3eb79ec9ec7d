//! Best-effort synchronization with the remote REST backend
//!
//! Local state is always the source of truth. Remote calls run in the
//! background and their failures never roll back a local mutation.

mod client;

use std::future::Future;
use tokio::task::JoinHandle;

use crate::{Error, Result};

pub use client::RemoteSync;

/// What a remote call ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No base URL configured; nothing was sent
    Skipped,
    /// The record was POSTed
    Created,
    /// The record already existed and was PUT
    Updated,
}

/// Handle to a background sync call.
///
/// Dropping the handle detaches the call; awaiting [`SyncHandle::wait`]
/// yields the remote outcome.
#[derive(Debug)]
pub struct SyncHandle {
    inner: JoinHandle<Result<SyncOutcome>>,
}

impl SyncHandle {
    pub(crate) fn spawn<F>(job: F) -> Self
    where
        F: Future<Output = Result<SyncOutcome>> + Send + 'static,
    {
        Self {
            inner: tokio::spawn(job),
        }
    }

    /// Whether the remote call has completed
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Wait for the remote call to complete
    pub async fn wait(self) -> Result<SyncOutcome> {
        self.inner
            .await
            .map_err(|e| Error::Sync(format!("Background sync did not complete: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_returns_job_result() {
        let handle = SyncHandle::spawn(async { Ok::<_, Error>(SyncOutcome::Created) });
        assert_eq!(handle.wait().await.unwrap(), SyncOutcome::Created);
    }

    #[tokio::test]
    async fn test_wait_propagates_job_error() {
        let handle = SyncHandle::spawn(async { Err::<SyncOutcome, _>(Error::Remote("boom".into())) });
        assert!(matches!(handle.wait().await, Err(Error::Remote(_))));
    }

    async fn exploding_job() -> Result<SyncOutcome> {
        panic!("sync task blew up")
    }

    #[tokio::test]
    async fn test_panicking_job_is_sync_error() {
        let handle = SyncHandle::spawn(exploding_job());
        assert!(matches!(handle.wait().await, Err(Error::Sync(_))));
    }
}
