use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::github::error::{FetchError, Result};

/// Owns the cancellation handle of the fetch that is allowed to publish.
///
/// Every `begin` cancels the previous handle and bumps the generation, so
/// an older fetch can always tell it has been superseded.
#[derive(Debug, Default)]
pub(crate) struct LoadGuard {
    inner: Mutex<Inflight>,
}

#[derive(Debug, Default)]
struct Inflight {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Permission for one fetch (or one clear) to publish its outcome.
#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    pub generation: u64,
    token: CancellationToken,
    deadline: Instant,
}

impl LoadGuard {
    pub fn begin(&self, timeout: Duration) -> Ticket {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = inner.token.take() {
            debug!(generation = inner.generation, "Cancelling superseded fetch");
            previous.cancel();
        }
        inner.generation += 1;
        let token = CancellationToken::new();
        inner.token = Some(token.clone());

        Ticket {
            generation: inner.generation,
            token,
            deadline: Instant::now() + timeout,
        }
    }

    /// Cancel the current fetch, if any. Its outcome still publishes, as
    /// a cancellation.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match inner.token.take() {
            Some(token) => {
                debug!(generation = inner.generation, "Cancelling fetch");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel the current fetch and stop anything already running from
    /// publishing at all. The returned ticket owns no fetch.
    pub fn invalidate(&self) -> Ticket {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = inner.token.take() {
            token.cancel();
        }
        inner.generation += 1;

        Ticket {
            generation: inner.generation,
            token: CancellationToken::new(),
            deadline: Instant::now(),
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
            == ticket.generation
    }
}

impl Ticket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` until it finishes, the ticket is cancelled, or the
    /// deadline passes. Dropping `fut` aborts any request it has in flight.
    pub async fn run<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            _ = self.token.cancelled() => Err(FetchError::Canceled),
            res = tokio::time::timeout_at(self.deadline, fut) => {
                res.unwrap_or_else(|_| Err(FetchError::TimedOut))
            }
        }
    }
}
