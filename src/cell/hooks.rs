use std::{fmt, future::Future, sync::Arc};

use futures_util::future::{self, BoxFuture, FutureExt};

pub type HookFuture<T, E> = BoxFuture<'static, Result<T, E>>;

type HookHandler<I, T, E> = dyn Fn(I) -> HookFuture<T, E> + Send + Sync;

/// Interception step run between an entry-point call and the settlement of
/// the underlying future.
///
/// `I` is the hook input: the value for a resolve hook, the error for a
/// reject hook. `Ok` continues on the fulfilled track, `Err` on the
/// rejected one.
pub struct Hook<I, T, E> {
    handler: Arc<HookHandler<I, T, E>>,
}

pub type ResolveHook<T, E> = Hook<T, T, E>;
pub type RejectHook<T, E> = Hook<E, T, E>;

impl<I, T, E> Hook<I, T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let handler: Arc<HookHandler<I, T, E>> = Arc::new(move |input: I| handler(input).boxed());
        Self { handler }
    }

    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(I) -> Result<T, E> + Send + Sync + 'static,
    {
        let handler: Arc<HookHandler<I, T, E>> =
            Arc::new(move |input: I| future::ready(handler(input)).boxed());
        Self { handler }
    }

    pub(crate) fn call(&self, input: I) -> HookFuture<T, E> {
        (self.handler)(input)
    }
}

impl<T, E> Hook<T, T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Default resolve hook: the value passes through untouched.
    pub fn identity() -> Self {
        Self::from_fn(Ok)
    }
}

impl<T, E> Hook<E, T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Default reject hook: the error passes through untouched.
    pub fn propagate() -> Self {
        Self::from_fn(Err)
    }
}

impl<I, T, E> Clone for Hook<I, T, E> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<I, T, E> fmt::Debug for Hook<I, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").finish_non_exhaustive()
    }
}
