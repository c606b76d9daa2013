use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(Uuid);

impl CellId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The outcome track a cell commits to on its first `resolve`/`reject` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Resolve,
    Reject,
}

/// Lifecycle of a settlement cell.
///
/// `Committed*` states are transient: the hook for that track is queued or
/// running. `Settled*` states mean the underlying future's settle capability
/// has been invoked (or dropped, see [`crate::cell::Rejection::Abandoned`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementState {
    Open,
    CommittedResolve,
    CommittedReject,
    SettledResolved,
    SettledRejected,
}

impl SettlementState {
    pub fn committed(track: Track) -> Self {
        match track {
            Track::Resolve => Self::CommittedResolve,
            Track::Reject => Self::CommittedReject,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn is_settled(self) -> bool {
        matches!(self, Self::SettledResolved | Self::SettledRejected)
    }

    pub fn track(self) -> Option<Track> {
        match self {
            Self::Open => None,
            Self::CommittedResolve | Self::SettledResolved => Some(Track::Resolve),
            Self::CommittedReject | Self::SettledRejected => Some(Track::Reject),
        }
    }

    pub fn flags(self) -> SettlementFlags {
        match self.track() {
            None => SettlementFlags::OPEN,
            Some(Track::Resolve) => SettlementFlags::RESOLVED,
            Some(Track::Reject) => SettlementFlags::REJECTED,
        }
    }
}

/// Observable projection of [`SettlementState`].
///
/// `resolved` and `rejected` are never both set; `fulfilled` is set whenever
/// either of them is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettlementFlags {
    pub fulfilled: bool,
    pub resolved: bool,
    pub rejected: bool,
}

impl SettlementFlags {
    pub const OPEN: Self = Self {
        fulfilled: false,
        resolved: false,
        rejected: false,
    };
    pub const RESOLVED: Self = Self {
        fulfilled: true,
        resolved: true,
        rejected: false,
    };
    pub const REJECTED: Self = Self {
        fulfilled: true,
        resolved: false,
        rejected: true,
    };
}
