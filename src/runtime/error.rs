use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleErrorKind {
    NoRuntime,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (implementation={implementation})")]
pub struct ScheduleError {
    pub kind: ScheduleErrorKind,
    pub implementation: String,
    pub message: String,
}

impl ScheduleError {
    pub fn new(
        kind: ScheduleErrorKind,
        implementation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            implementation: implementation.into(),
            message: message.into(),
        }
    }
}

pub fn no_runtime(implementation: impl Into<String>, message: impl Into<String>) -> ScheduleError {
    ScheduleError::new(ScheduleErrorKind::NoRuntime, implementation, message)
}

pub fn closed(implementation: impl Into<String>, message: impl Into<String>) -> ScheduleError {
    ScheduleError::new(ScheduleErrorKind::Closed, implementation, message)
}
