//! Settle-once async value cell with observable settlement flags and
//! interception hooks that run right before the value settles.

pub mod cell;
pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod runtime;

pub use cell::{
    CellId, CellOptions, Rejection, SettlementCell, SettlementFlags, SettlementFuture,
    SettlementState, Settler,
};
pub use runtime::{FutureAdapter, FutureImplementation, set_future_implementation};
