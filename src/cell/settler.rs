use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::oneshot;

use crate::cell::error::Rejection;

type Slot<T, E> = Arc<Mutex<Option<oneshot::Sender<Result<T, E>>>>>;

/// Settle capability of a [`crate::cell::SettlementFuture`].
///
/// Clones share one slot: whichever of `fulfill`/`reject` runs first settles
/// the future, every later call returns `false`.
pub struct Settler<T, E> {
    slot: Slot<T, E>,
}

impl<T, E> Settler<T, E> {
    pub(crate) fn new(sender: oneshot::Sender<Result<T, E>>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(sender))),
        }
    }

    pub fn fulfill(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    pub fn reject(&self, error: E) -> bool {
        self.settle(Err(error))
    }

    pub fn is_spent(&self) -> bool {
        self.lock_slot().is_none()
    }

    /// Drops the capability unused; readers observe [`Rejection::Abandoned`].
    pub(crate) fn abandon(&self) -> bool {
        self.lock_slot().take().is_some()
    }

    pub(crate) fn settle_outcome(&self, outcome: Result<T, Rejection<E>>) -> bool {
        match outcome {
            Ok(value) => self.fulfill(value),
            Err(Rejection::Rejected(error)) => self.reject(error),
            Err(Rejection::Abandoned) => self.abandon(),
        }
    }

    fn settle(&self, outcome: Result<T, E>) -> bool {
        let Some(sender) = self.lock_slot().take() else {
            return false;
        };
        // A dropped receiver means nobody can read the value any more; the
        // capability is still consumed.
        let _ = sender.send(outcome);
        true
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<oneshot::Sender<Result<T, E>>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Clone for Settler<T, E> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T, E> fmt::Debug for Settler<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settler")
            .field("spent", &self.is_spent())
            .finish()
    }
}
