pub mod error;
pub mod future;
pub mod hooks;
pub mod options;
pub mod settlement;
pub mod settler;
pub mod types;

pub use error::Rejection;
pub use future::{SettlementFuture, SettlementOutcome};
pub use hooks::{Hook, HookFuture, RejectHook, ResolveHook};
pub use options::CellOptions;
pub use settlement::SettlementCell;
pub use settler::Settler;
pub use types::{CellId, SettlementFlags, SettlementState, Track};
