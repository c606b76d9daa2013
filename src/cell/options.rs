use std::{fmt, future::Future, sync::Arc};

use crate::{
    cell::hooks::{Hook, RejectHook, ResolveHook},
    config::CellDefaults,
    diagnostics::RejectionDiagnostics,
    runtime::FutureImplementation,
};

/// Construction options for a [`crate::cell::SettlementCell`].
///
/// Every field is optional. Unset hooks fall back to pass-through, unset
/// `suppress_unhandled_diagnostics` falls back to [`CellDefaults`] (explicit
/// `defaults`, else the installed process settings), unset `implementation`
/// falls back to the registered future implementation.
pub struct CellOptions<T, E> {
    pub(crate) on_resolve: Option<ResolveHook<T, E>>,
    pub(crate) on_reject: Option<RejectHook<T, E>>,
    pub(crate) suppress_unhandled_diagnostics: Option<bool>,
    pub(crate) diagnostics: Option<Arc<dyn RejectionDiagnostics>>,
    pub(crate) implementation: Option<Arc<dyn FutureImplementation>>,
    pub(crate) defaults: Option<CellDefaults>,
}

impl<T, E> CellOptions<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_resolve<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.on_resolve = Some(Hook::new(hook));
        self
    }

    pub fn on_resolve_sync<F>(mut self, hook: F) -> Self
    where
        F: Fn(T) -> Result<T, E> + Send + Sync + 'static,
    {
        self.on_resolve = Some(Hook::from_fn(hook));
        self
    }

    pub fn on_reject<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.on_reject = Some(Hook::new(hook));
        self
    }

    pub fn on_reject_sync<F>(mut self, hook: F) -> Self
    where
        F: Fn(E) -> Result<T, E> + Send + Sync + 'static,
    {
        self.on_reject = Some(Hook::from_fn(hook));
        self
    }

    pub fn resolve_hook(mut self, hook: ResolveHook<T, E>) -> Self {
        self.on_resolve = Some(hook);
        self
    }

    pub fn reject_hook(mut self, hook: RejectHook<T, E>) -> Self {
        self.on_reject = Some(hook);
        self
    }

    pub fn suppress_unhandled_diagnostics(mut self, suppress: bool) -> Self {
        self.suppress_unhandled_diagnostics = Some(suppress);
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn RejectionDiagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn implementation(mut self, implementation: Arc<dyn FutureImplementation>) -> Self {
        self.implementation = Some(implementation);
        self
    }

    pub fn defaults(mut self, defaults: CellDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }
}

impl<T, E> Default for CellOptions<T, E> {
    fn default() -> Self {
        Self {
            on_resolve: None,
            on_reject: None,
            suppress_unhandled_diagnostics: None,
            diagnostics: None,
            implementation: None,
            defaults: None,
        }
    }
}

impl<T, E> fmt::Debug for CellOptions<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellOptions")
            .field("on_resolve", &self.on_resolve.is_some())
            .field("on_reject", &self.on_reject.is_some())
            .field(
                "suppress_unhandled_diagnostics",
                &self.suppress_unhandled_diagnostics,
            )
            .field("diagnostics", &self.diagnostics.is_some())
            .field(
                "implementation",
                &self.implementation.as_ref().map(|item| item.name().to_string()),
            )
            .field("defaults", &self.defaults)
            .finish()
    }
}
