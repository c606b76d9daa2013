use std::{
    fmt,
    future::Future,
    panic::AssertUnwindSafe,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use futures_util::future::FutureExt;

use crate::{
    cell::{
        error::Rejection,
        future::{SettlementFuture, SettlementOutcome},
        hooks::{Hook, RejectHook, ResolveHook},
        options::CellOptions,
        settler::Settler,
        types::{CellId, SettlementFlags, SettlementState, Track},
    },
    config,
    diagnostics::{RejectionDiagnostics, TracingDiagnostics},
    runtime::{self, FutureImplementation},
};

const LOG_TARGET: &str = "settle_cell";

/// Settle-once value container with interception hooks.
///
/// The first call to [`resolve`](Self::resolve) or [`reject`](Self::reject)
/// commits the cell to a track; later calls to either are no-ops. The hook
/// for the committed track then runs as a separately scheduled task, and only
/// after it completes is the underlying [`SettlementFuture`] settled:
///
/// - a resolve hook returning `Ok(v)` fulfills with `v`;
/// - a resolve hook returning `Err(e)` escalates: the cell switches to the
///   reject track and runs the reject pipeline with `e`;
/// - a reject hook returning `Ok(v)` recovers: the cell fulfills with `v`
///   without running the resolve hook;
/// - a reject hook returning `Err(e)` rejects with `e`.
///
/// Clones share the same cell.
pub struct SettlementCell<T, E> {
    inner: Arc<CellInner<T, E>>,
}

struct CellInner<T, E> {
    id: CellId,
    state: Mutex<SettlementState>,
    settler: Settler<T, E>,
    future: SettlementFuture<T, E>,
    on_resolve: ResolveHook<T, E>,
    on_reject: RejectHook<T, E>,
    implementation: Arc<dyn FutureImplementation>,
    diagnostics: Arc<dyn RejectionDiagnostics>,
    observed: AtomicBool,
}

impl<T, E> SettlementCell<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + fmt::Debug + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_options(CellOptions::default())
    }

    pub fn with_options(options: CellOptions<T, E>) -> Self {
        let CellOptions {
            on_resolve,
            on_reject,
            suppress_unhandled_diagnostics,
            diagnostics,
            implementation,
            defaults,
        } = options;

        let defaults = defaults.unwrap_or_else(config::cell_defaults);
        let suppress_unhandled =
            suppress_unhandled_diagnostics.unwrap_or(defaults.suppress_unhandled_diagnostics);
        let implementation = implementation.unwrap_or_else(runtime::future_implementation);
        let diagnostics = diagnostics.unwrap_or_else(|| Arc::new(TracingDiagnostics));
        let (settler, future) = SettlementFuture::channel();

        let inner = CellInner {
            id: CellId::new(),
            state: Mutex::new(SettlementState::Open),
            settler,
            future,
            on_resolve: on_resolve.unwrap_or_else(Hook::identity),
            on_reject: on_reject.unwrap_or_else(Hook::propagate),
            implementation,
            diagnostics,
            // Suppression is a handler attached up front: the rejection is
            // then never considered unhandled.
            observed: AtomicBool::new(suppress_unhandled),
        };

        tracing::trace!(
            target: LOG_TARGET,
            cell_id = %inner.id,
            implementation = inner.implementation.name(),
            suppress_unhandled,
            "cell_created"
        );

        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn resolve(&self, value: T) -> &Self {
        if !self.inner.commit(Track::Resolve) {
            return self;
        }

        let pipeline = Pipeline::new(Arc::clone(&self.inner), Track::Resolve);
        self.inner
            .schedule(Track::Resolve, async move { pipeline.run_resolve(value).await });
        self
    }

    pub fn reject(&self, error: E) -> &Self {
        if !self.inner.commit(Track::Reject) {
            return self;
        }

        let pipeline = Pipeline::new(Arc::clone(&self.inner), Track::Reject);
        self.inner
            .schedule(Track::Reject, async move { pipeline.run_reject(error).await });
        self
    }

    /// Returns a reader handle on the underlying future and marks the
    /// rejection as handled.
    pub fn future(&self) -> SettlementFuture<T, E> {
        self.inner.observed.store(true, Ordering::Release);
        self.inner.future.clone()
    }

    pub fn then<U, F>(
        &self,
        on_fulfilled: F,
    ) -> impl Future<Output = SettlementOutcome<U, E>> + use<T, E, U, F>
    where
        F: FnOnce(T) -> U,
    {
        self.future().then(on_fulfilled)
    }

    pub fn catch<F>(&self, on_rejected: F) -> impl Future<Output = T> + use<T, E, F>
    where
        F: FnOnce(Rejection<E>) -> T,
    {
        self.future().catch(on_rejected)
    }
}

impl<T, E> SettlementCell<T, E> {
    pub fn id(&self) -> CellId {
        self.inner.id
    }

    pub fn state(&self) -> SettlementState {
        *self.inner.lock_state()
    }

    pub fn flags(&self) -> SettlementFlags {
        self.state().flags()
    }

    pub fn is_fulfilled(&self) -> bool {
        self.flags().fulfilled
    }

    pub fn is_resolved(&self) -> bool {
        self.flags().resolved
    }

    pub fn is_rejected(&self) -> bool {
        self.flags().rejected
    }

    /// Whether the underlying future's settle capability has been used.
    pub fn is_settled(&self) -> bool {
        self.state().is_settled()
    }

    pub fn implementation_name(&self) -> &str {
        self.inner.implementation.name()
    }
}

impl<T, E> CellInner<T, E> {
    fn lock_state(&self) -> MutexGuard<'_, SettlementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ends a committed cell without a hook outcome. No-op once settled.
    fn abandon(&self, track: Track, cause: &'static str) {
        {
            let mut state = self.lock_state();
            if state.is_settled() {
                return;
            }
            *state = SettlementState::SettledRejected;
        }
        if !self.settler.abandon() {
            return;
        }

        tracing::warn!(
            target: LOG_TARGET,
            cell_id = %self.id,
            track = ?track,
            cause,
            "settlement_abandoned"
        );
        if !self.observed.load(Ordering::Acquire) {
            self.diagnostics
                .report_unhandled(self.id, &format!("settlement abandoned: {cause}"));
        }
    }
}

/// Owns a cell for the lifetime of one scheduled pipeline task. Dropping the
/// task before the pipeline finishes abandons the cell.
struct Pipeline<T, E> {
    inner: Arc<CellInner<T, E>>,
    track: Track,
    armed: bool,
}

impl<T, E> Pipeline<T, E> {
    fn new(inner: Arc<CellInner<T, E>>, track: Track) -> Self {
        Self {
            inner,
            track,
            armed: true,
        }
    }
}

impl<T, E> Pipeline<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + fmt::Debug + Send + Sync + 'static,
{
    async fn run_resolve(mut self, value: T) {
        Arc::clone(&self.inner).run_resolve(value).await;
        self.armed = false;
    }

    async fn run_reject(mut self, error: E) {
        Arc::clone(&self.inner).run_reject(error).await;
        self.armed = false;
    }
}

impl<T, E> Drop for Pipeline<T, E> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.abandon(self.track, "pipeline_dropped");
        }
    }
}

impl<T, E> CellInner<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + fmt::Debug + Send + Sync + 'static,
{
    fn commit(&self, track: Track) -> bool {
        let mut state = self.lock_state();
        if !state.is_open() {
            tracing::debug!(
                target: LOG_TARGET,
                cell_id = %self.id,
                requested = ?track,
                state = ?*state,
                "settlement_noop"
            );
            return false;
        }

        *state = SettlementState::committed(track);
        tracing::debug!(
            target: LOG_TARGET,
            cell_id = %self.id,
            track = ?track,
            "settlement_committed"
        );
        true
    }

    fn schedule<F>(&self, track: Track, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Err(err) = self.implementation.schedule(task.boxed()) else {
            return;
        };

        tracing::error!(
            target: LOG_TARGET,
            cell_id = %self.id,
            track = ?track,
            implementation = self.implementation.name(),
            error = %err,
            "settlement_schedule_failed"
        );
        self.abandon(track, "schedule_failed");
    }

    // The hook outcome is settled in the hook's own task rather than in a
    // further scheduled continuation.
    async fn run_resolve(self: Arc<Self>, value: T) {
        match invoke(&self.on_resolve, value).await {
            Some(Ok(value)) => self.settle_fulfilled(value),
            Some(Err(error)) => self.escalate(error),
            None => self.abandon_after_panic(Track::Resolve),
        }
    }

    async fn run_reject(self: Arc<Self>, error: E) {
        match invoke(&self.on_reject, error).await {
            Some(Ok(value)) => self.settle_fulfilled(value),
            Some(Err(error)) => self.settle_rejected(error),
            None => self.abandon_after_panic(Track::Reject),
        }
    }

    fn abandon_after_panic(&self, track: Track) {
        tracing::error!(
            target: LOG_TARGET,
            cell_id = %self.id,
            track = ?track,
            "settlement_hook_panicked"
        );
        self.abandon(track, "hook_panicked");
    }

    fn escalate(self: &Arc<Self>, error: E) {
        {
            // Reset and re-commit under one guard: `Open` is never observable.
            let mut state = self.lock_state();
            debug_assert_eq!(*state, SettlementState::CommittedResolve);
            *state = SettlementState::committed(Track::Reject);
        }
        tracing::debug!(
            target: LOG_TARGET,
            cell_id = %self.id,
            error = ?error,
            "settlement_escalated"
        );

        let pipeline = Pipeline::new(Arc::clone(self), Track::Reject);
        self.schedule(Track::Reject, async move { pipeline.run_reject(error).await });
    }

    fn settle_fulfilled(&self, value: T) {
        let previous = std::mem::replace(&mut *self.lock_state(), SettlementState::SettledResolved);
        if !self.settler.fulfill(value) {
            tracing::warn!(target: LOG_TARGET, cell_id = %self.id, "settlement_capability_spent");
            return;
        }

        tracing::debug!(
            target: LOG_TARGET,
            cell_id = %self.id,
            outcome = "fulfilled",
            recovered = (previous == SettlementState::CommittedReject),
            "settlement_settled"
        );
    }

    fn settle_rejected(&self, error: E) {
        *self.lock_state() = SettlementState::SettledRejected;
        let unhandled_reason =
            (!self.observed.load(Ordering::Acquire)).then(|| format!("{error:?}"));
        if !self.settler.reject(error) {
            tracing::warn!(target: LOG_TARGET, cell_id = %self.id, "settlement_capability_spent");
            return;
        }

        tracing::debug!(
            target: LOG_TARGET,
            cell_id = %self.id,
            outcome = "rejected",
            "settlement_settled"
        );
        if let Some(reason) = unhandled_reason {
            self.diagnostics.report_unhandled(self.id, &reason);
        }
    }
}

/// Runs a hook to completion; `None` means it panicked.
async fn invoke<I, T, E>(hook: &Hook<I, T, E>, input: I) -> Option<Result<T, E>>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    // Synchronous hooks run inside `call`, so the call itself must be polled
    // under `catch_unwind`.
    AssertUnwindSafe(async move { hook.call(input).await })
        .catch_unwind()
        .await
        .ok()
}

impl<T, E> Clone for SettlementCell<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> Default for SettlementCell<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + fmt::Debug + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for SettlementCell<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettlementCell")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .field("implementation", &self.inner.implementation.name())
            .finish()
    }
}
