pub mod logged;
pub mod noop;
pub mod ports;

pub use logged::TracingDiagnostics;
pub use noop::NoopDiagnostics;
pub use ports::RejectionDiagnostics;
