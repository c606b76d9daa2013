use crate::cell::CellId;

/// Receives rejections that settled while no reader was attached to the
/// cell's future.
pub trait RejectionDiagnostics: Send + Sync {
    fn report_unhandled(&self, cell_id: CellId, reason: &str);
}
