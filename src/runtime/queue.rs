use std::{
    collections::VecDeque,
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use futures_util::future::BoxFuture;

use crate::runtime::{
    error::{ScheduleError, closed},
    ports::FutureImplementation,
};

const NAME: &str = "deferred-queue";

type Task = BoxFuture<'static, ()>;

/// FIFO continuation queue drained explicitly by its owner.
///
/// Tasks run one at a time, in scheduling order, only when `run_next` or
/// `run_until_idle` is awaited. Tasks scheduled while draining are appended
/// and picked up by the same drain.
#[derive(Clone, Default)]
pub struct DeferredQueue {
    tasks: Arc<Mutex<VecDeque<Task>>>,
    closed: Arc<AtomicBool>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock_tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_tasks().is_empty()
    }

    /// Rejects further scheduling and drops everything still queued.
    pub fn close(&self) -> usize {
        self.closed.store(true, Ordering::Release);
        let dropped: Vec<Task> = self.lock_tasks().drain(..).collect();
        dropped.len()
    }

    pub async fn run_next(&self) -> bool {
        let next = self.lock_tasks().pop_front();
        match next {
            Some(task) => {
                task.await;
                true
            }
            None => false,
        }
    }

    pub async fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next().await {
            ran += 1;
        }
        ran
    }

    fn lock_tasks(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FutureImplementation for DeferredQueue {
    fn name(&self) -> &str {
        NAME
    }

    fn schedule(&self, task: Task) -> Result<(), ScheduleError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(closed(NAME, "deferred queue is closed"));
        }
        self.lock_tasks().push_back(task);
        Ok(())
    }
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("len", &self.len())
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}
