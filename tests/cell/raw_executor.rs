use std::time::Duration;

use settle_cell::{Rejection, SettlementFuture};

#[tokio::test]
async fn executor_fulfills_every_reader() {
    let future = SettlementFuture::<String, String>::from_executor(|settler| {
        settler.fulfill("done".to_string());
    });

    let (left, right) = tokio::join!(future.clone(), future);
    assert_eq!(left, Ok("done".to_string()));
    assert_eq!(right, Ok("done".to_string()));
}

#[tokio::test]
async fn executor_can_settle_later_from_another_task() {
    let future = SettlementFuture::<u32, String>::from_executor(|settler| {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            settler.reject("late failure".to_string());
        });
    });

    assert_eq!(
        future.await,
        Err(Rejection::Rejected("late failure".to_string()))
    );
}

#[tokio::test]
async fn executor_settler_ignores_second_settlement() {
    let future = SettlementFuture::<u32, String>::from_executor(|settler| {
        let second = settler.clone();
        assert!(settler.reject("first".to_string()));
        assert!(!second.fulfill(2));
    });

    assert_eq!(future.await, Err(Rejection::Rejected("first".to_string())));
}
