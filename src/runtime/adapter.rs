use std::{fmt, future::Future, sync::Arc};

use futures_util::future::{self, FutureExt};

use crate::{
    cell::{Rejection, SettlementFuture, SettlementOutcome},
    runtime::{ports::FutureImplementation, registry::future_implementation},
};

/// Enumerated combinator surface over one [`FutureImplementation`].
///
/// Every result is a [`SettlementFuture`] whose driving task is scheduled on
/// the wrapped implementation.
#[derive(Clone)]
pub struct FutureAdapter {
    implementation: Arc<dyn FutureImplementation>,
}

impl FutureAdapter {
    pub fn new(implementation: Arc<dyn FutureImplementation>) -> Self {
        Self { implementation }
    }

    /// Adapter over the currently registered implementation.
    pub fn current() -> Self {
        Self::new(future_implementation())
    }

    pub fn implementation(&self) -> &Arc<dyn FutureImplementation> {
        &self.implementation
    }

    /// Fulfills with every value in input order, or rejects with the first
    /// rejection to settle.
    pub fn all<T, E, I>(&self, futures: I) -> SettlementFuture<Vec<T>, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        I: IntoIterator<Item = SettlementFuture<T, E>>,
    {
        let futures: Vec<_> = futures.into_iter().collect();
        self.drive("all", future::try_join_all(futures))
    }

    /// Fulfills with each input's outcome in input order; never rejects.
    pub fn all_settled<T, E, I>(&self, futures: I) -> SettlementFuture<Vec<SettlementOutcome<T, E>>, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        I: IntoIterator<Item = SettlementFuture<T, E>>,
    {
        let futures: Vec<_> = futures.into_iter().collect();
        self.drive("all_settled", async move {
            Ok::<_, Rejection<E>>(future::join_all(futures).await)
        })
    }

    /// Settles like the first input to settle. An empty input never settles.
    pub fn race<T, E, I>(&self, futures: I) -> SettlementFuture<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        I: IntoIterator<Item = SettlementFuture<T, E>>,
    {
        let futures: Vec<_> = futures.into_iter().collect();
        if futures.is_empty() {
            return self.drive("race", future::pending::<SettlementOutcome<T, E>>());
        }

        self.drive("race", async move {
            let (outcome, _index, _rest) = future::select_all(futures).await;
            outcome
        })
    }

    pub fn resolve<T, E>(&self, value: T) -> SettlementFuture<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        SettlementFuture::from_executor(|settler| {
            settler.fulfill(value);
        })
    }

    pub fn reject<T, E>(&self, error: E) -> SettlementFuture<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        SettlementFuture::from_executor(|settler| {
            settler.reject(error);
        })
    }

    fn drive<T, E, F>(&self, operation: &'static str, work: F) -> SettlementFuture<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        F: Future<Output = SettlementOutcome<T, E>> + Send + 'static,
    {
        let (settler, settled) = SettlementFuture::channel();
        let task = async move {
            settler.settle_outcome(work.await);
        };

        if let Err(err) = self.implementation.schedule(task.boxed()) {
            tracing::error!(
                target: "settle_cell::runtime",
                operation,
                implementation = self.implementation.name(),
                error = %err,
                "combinator_schedule_failed"
            );
        }
        settled
    }
}

impl Default for FutureAdapter {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Debug for FutureAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureAdapter")
            .field("implementation", &self.implementation.name())
            .finish()
    }
}
