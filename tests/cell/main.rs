mod flags;
mod hooks;
mod raw_executor;

use std::sync::{Arc, Mutex};

use settle_cell::{
    CellOptions, SettlementCell, cell::CellId, diagnostics::RejectionDiagnostics,
    runtime::DeferredQueue,
};

#[derive(Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<(CellId, String)>>,
}

impl RecordingDiagnostics {
    pub fn reports(&self) -> Vec<(CellId, String)> {
        self.reports.lock().expect("lock poisoned").clone()
    }
}

impl RejectionDiagnostics for RecordingDiagnostics {
    fn report_unhandled(&self, cell_id: CellId, reason: &str) {
        self.reports
            .lock()
            .expect("lock poisoned")
            .push((cell_id, reason.to_string()));
    }
}

pub fn queued_cell<T, E>(queue: &DeferredQueue, options: CellOptions<T, E>) -> SettlementCell<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + std::fmt::Debug + Send + Sync + 'static,
{
    SettlementCell::with_options(options.implementation(Arc::new(queue.clone())))
}
