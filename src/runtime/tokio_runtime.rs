use futures_util::future::BoxFuture;
use tokio::runtime::Handle;

use crate::runtime::{
    error::{ScheduleError, no_runtime},
    ports::FutureImplementation,
};

const NAME: &str = "tokio";

/// Spawns cell continuations as tokio tasks.
///
/// Without a pinned handle the runtime is looked up on every `schedule` call,
/// so cells built outside a runtime still work once driven from inside one.
#[derive(Debug, Clone, Default)]
pub struct TokioImplementation {
    handle: Option<Handle>,
}

impl TokioImplementation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Pins the runtime of the calling context, if there is one.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::with_handle)
    }
}

impl FutureImplementation for TokioImplementation {
    fn name(&self) -> &str {
        NAME
    }

    fn schedule(&self, task: BoxFuture<'static, ()>) -> Result<(), ScheduleError> {
        let handle = match &self.handle {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(|err| {
                no_runtime(NAME, format!("no tokio runtime in the current context: {err}"))
            })?,
        };

        drop(handle.spawn(task));
        Ok(())
    }
}
