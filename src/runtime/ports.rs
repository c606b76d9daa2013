use futures_util::future::BoxFuture;

use crate::runtime::error::ScheduleError;

/// Executes the continuations that drive settlement cells.
///
/// Every hook invocation and every escalated reject pipeline is handed to
/// `schedule` as its own task; implementations must never poll the task
/// inline before `schedule` returns.
pub trait FutureImplementation: Send + Sync {
    fn name(&self) -> &str;

    fn schedule(&self, task: BoxFuture<'static, ()>) -> Result<(), ScheduleError>;
}
