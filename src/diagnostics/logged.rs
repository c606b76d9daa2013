use crate::{cell::CellId, diagnostics::ports::RejectionDiagnostics};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl RejectionDiagnostics for TracingDiagnostics {
    fn report_unhandled(&self, cell_id: CellId, reason: &str) {
        tracing::warn!(
            target: "settle_cell::diagnostics",
            cell_id = %cell_id,
            reason = %reason,
            "unhandled_rejection"
        );
    }
}
