pub mod adapter;
pub mod error;
pub mod ports;
pub mod queue;
pub mod registry;
pub mod tokio_runtime;

pub use adapter::FutureAdapter;
pub use error::{ScheduleError, ScheduleErrorKind};
pub use ports::FutureImplementation;
pub use queue::DeferredQueue;
pub use registry::{future_implementation, reset_future_implementation, set_future_implementation};
pub use tokio_runtime::TokioImplementation;
