use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use futures_util::future::BoxFuture;

use settle_cell::{
    FutureAdapter, FutureImplementation, Rejection,
    runtime::{DeferredQueue, ScheduleError, TokioImplementation},
};

use crate::resolved_cell;

#[derive(Default)]
struct CountingImplementation {
    scheduled: AtomicUsize,
    inner: TokioImplementation,
}

impl FutureImplementation for CountingImplementation {
    fn name(&self) -> &str {
        "counting"
    }

    fn schedule(&self, task: BoxFuture<'static, ()>) -> Result<(), ScheduleError> {
        self.scheduled.fetch_add(1, Ordering::SeqCst);
        self.inner.schedule(task)
    }
}

#[tokio::test]
async fn adapter_delegates_to_the_injected_implementation() {
    let implementation = Arc::new(CountingImplementation::default());
    let adapter = FutureAdapter::new(implementation.clone());
    assert_eq!(adapter.implementation().name(), "counting");

    let values = adapter
        .all([resolved_cell(1).future(), resolved_cell(2).future()])
        .await;
    assert_eq!(values, Ok(vec![1, 2]));

    let first = adapter.race([resolved_cell(3).future()]).await;
    assert_eq!(first, Ok(3));

    adapter.resolve::<u8, String>(0).await.expect("already settled");
    assert_eq!(implementation.scheduled.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn adapter_on_a_queue_waits_for_the_queue_to_drain() {
    let queue = DeferredQueue::new();
    let adapter = FutureAdapter::new(Arc::new(queue.clone()));

    let combined = adapter.all_settled([resolved_cell(4).future()]);
    assert_eq!(queue.len(), 1);

    assert_eq!(queue.run_until_idle().await, 1);
    assert_eq!(combined.await, Ok(vec![Ok(4)]));
}

#[tokio::test]
async fn adapter_on_a_closed_queue_abandons_its_results() {
    let queue = DeferredQueue::new();
    queue.close();
    let adapter = FutureAdapter::new(Arc::new(queue));

    let combined = adapter.all([resolved_cell(1).future()]);
    assert_eq!(combined.await, Err(Rejection::Abandoned));
}
