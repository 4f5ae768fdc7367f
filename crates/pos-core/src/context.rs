//! Cancellable request context passed into every service operation.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::result::AppResult;

/// Caller-supplied cancellation signal and optional deadline.
///
/// Reads are raced against the context with [`RequestContext::guard`].
/// Before a write phase, services call [`RequestContext::checkpoint`] and
/// then run the writes to completion, so an abandoned request either
/// fails before any side effect or not at all.
#[derive(Debug, Clone)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context whose deadline elapses after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Wrap an existing cancellation token, e.g. one tied to server shutdown.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Signal cancellation to every clone of this context.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context was cancelled or its deadline has passed.
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|at| Instant::now() >= at)
    }

    /// Fail with `Cancelled` if the caller has gone away.
    pub fn checkpoint(&self) -> AppResult<()> {
        if self.token.is_cancelled() {
            return Err(AppError::cancelled("Request cancelled"));
        }
        if self.deadline.is_some_and(|at| Instant::now() >= at) {
            return Err(AppError::cancelled("Request deadline exceeded"));
        }
        Ok(())
    }

    /// Run `fut` unless the context is cancelled or its deadline passes first.
    ///
    /// Only side-effect-free futures should be guarded; dropping a write
    /// halfway would leave partial state behind.
    pub async fn guard<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.checkpoint()?;

        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(AppError::cancelled("Request cancelled")),
            _ = deadline => Err(AppError::cancelled("Request deadline exceeded")),
            result = fut => result,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
