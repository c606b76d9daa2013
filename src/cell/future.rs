use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;

use crate::cell::{error::Rejection, settler::Settler};

pub type SettlementOutcome<T, E> = Result<T, Rejection<E>>;

/// Shared single-value future backing a settlement cell.
///
/// Any number of clones may await it; all of them observe the same outcome.
pub struct SettlementFuture<T, E> {
    inner: Shared<BoxFuture<'static, SettlementOutcome<T, E>>>,
}

impl<T, E> SettlementFuture<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub(crate) fn channel() -> (Settler<T, E>, Self) {
        let (sender, receiver) = oneshot::channel::<Result<T, E>>();
        let inner = async move {
            match receiver.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(error)) => Err(Rejection::Rejected(error)),
                Err(_) => Err(Rejection::Abandoned),
            }
        }
        .boxed()
        .shared();

        (Settler::new(sender), Self { inner })
    }

    /// Builds a plain future settled by `executor` through the given
    /// [`Settler`]. No hooks run and no settlement flags are tracked.
    pub fn from_executor<F>(executor: F) -> Self
    where
        F: FnOnce(Settler<T, E>),
    {
        let (settler, future) = Self::channel();
        executor(settler);
        future
    }

    pub fn then<U, F>(self, on_fulfilled: F) -> impl Future<Output = SettlementOutcome<U, E>>
    where
        F: FnOnce(T) -> U,
    {
        self.map(|outcome| outcome.map(on_fulfilled))
    }

    pub fn catch<F>(self, on_rejected: F) -> impl Future<Output = T>
    where
        F: FnOnce(Rejection<E>) -> T,
    {
        self.map(|outcome| outcome.unwrap_or_else(on_rejected))
    }
}

impl<T, E> Clone for SettlementFuture<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Future for SettlementFuture<T, E>
where
    T: Clone,
    E: Clone,
{
    type Output = SettlementOutcome<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T, E> fmt::Debug for SettlementFuture<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettlementFuture").finish_non_exhaustive()
    }
}
