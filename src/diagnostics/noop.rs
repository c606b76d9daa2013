use crate::{cell::CellId, diagnostics::ports::RejectionDiagnostics};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl RejectionDiagnostics for NoopDiagnostics {
    fn report_unhandled(&self, _cell_id: CellId, _reason: &str) {}
}
