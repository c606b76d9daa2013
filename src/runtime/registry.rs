use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::runtime::{ports::FutureImplementation, tokio_runtime::TokioImplementation};

static IMPLEMENTATION: LazyLock<RwLock<Arc<dyn FutureImplementation>>> =
    LazyLock::new(|| RwLock::new(default_implementation()));

fn default_implementation() -> Arc<dyn FutureImplementation> {
    Arc::new(TokioImplementation::new())
}

/// Rebinds the implementation backing every cell and adapter built from now
/// on. Existing cells keep the implementation they captured. Returns the
/// previous registration.
pub fn set_future_implementation(
    implementation: Arc<dyn FutureImplementation>,
) -> Arc<dyn FutureImplementation> {
    let mut guard = IMPLEMENTATION
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let previous = std::mem::replace(&mut *guard, implementation);
    tracing::info!(
        target: "settle_cell::runtime",
        previous = previous.name(),
        current = guard.name(),
        "future_implementation_registered"
    );
    previous
}

pub fn future_implementation() -> Arc<dyn FutureImplementation> {
    Arc::clone(
        &IMPLEMENTATION
            .read()
            .unwrap_or_else(PoisonError::into_inner),
    )
}

/// Restores the tokio-backed default.
pub fn reset_future_implementation() -> Arc<dyn FutureImplementation> {
    set_future_implementation(default_implementation())
}
