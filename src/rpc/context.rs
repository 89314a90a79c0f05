//! Cancellation and deadline context for blocking calls.

use std::future::{pending, Future};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::rpc::RpcError;

/// Carries an optional deadline and cancellation token into every RPC call.
///
/// When either fires, the in-flight request future is dropped, which aborts
/// the underlying network operation.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl CallContext {
    /// A context that never expires on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the context by `timeout` from now, keeping an earlier deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bound the context by `deadline`, keeping an earlier one.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Tie the context to `token`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails if the context is already canceled or past its deadline.
    pub fn check(&self) -> Result<(), RpcError> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(RpcError::Canceled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(RpcError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `fut` until it completes or the context ends.
    ///
    /// An already-ended context returns without polling `fut` at all.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, RpcError> {
        self.check()?;

        let canceled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending().await,
            }
        };

        tokio::select! {
            out = fut => Ok(out),
            _ = canceled => Err(RpcError::Canceled),
            _ = expired => Err(RpcError::DeadlineExceeded),
        }
    }
}
