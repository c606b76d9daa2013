use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use serde_json::{Value, json};
use tokio::time::sleep;

use settle_cell::{CellOptions, Rejection, SettlementCell, SettlementFlags};

#[tokio::test]
async fn default_hooks_are_transparent() {
    let resolved = SettlementCell::<Value, String>::new();
    resolved.resolve(json!({"foo": "bar"}));
    assert_eq!(resolved.future().await, Ok(json!({"foo": "bar"})));

    let rejected = SettlementCell::<Value, String>::new();
    rejected.reject("foo".to_string());
    assert_eq!(
        rejected.future().await,
        Err(Rejection::Rejected("foo".to_string()))
    );
}

#[tokio::test]
async fn entry_points_return_the_same_cell() {
    let cell = SettlementCell::<u8, String>::new();

    assert!(std::ptr::eq(cell.resolve(1), &cell));
    assert!(std::ptr::eq(cell.reject("ignored".to_string()), &cell));
    assert_eq!(cell.future().await, Ok(1));
}

#[tokio::test]
async fn resolve_hook_can_modify_the_value() {
    let cell = SettlementCell::with_options(CellOptions::<Value, String>::new().on_resolve_sync(
        |mut value| {
            value["a"] = json!(1);
            Ok(value)
        },
    ));

    cell.resolve(json!({"b": 2}));
    assert_eq!(cell.future().await, Ok(json!({"a": 1, "b": 2})));
}

#[tokio::test]
async fn async_resolve_hook_completes_before_settlement() {
    let cell = SettlementCell::with_options(CellOptions::<Value, String>::new().on_resolve(
        |mut value: Value| async move {
            value["newProperty"] = json!("new");
            sleep(Duration::from_millis(10)).await;
            value["changedProperty"] = json!("changed");
            Ok(value)
        },
    ));

    cell.resolve(json!({
        "unchangedProperty": "unchanged",
        "changedProperty": "unchanged",
    }));

    let payload = cell.future().await.expect("cell should fulfill");
    assert_eq!(payload["unchangedProperty"], "unchanged");
    assert_eq!(payload["changedProperty"], "changed");
    assert_eq!(payload["newProperty"], "new");
}

#[tokio::test]
async fn reject_hook_can_replace_the_error() {
    let cell = SettlementCell::with_options(
        CellOptions::<Value, String>::new()
            .on_reject_sync(|_| Err("onReject error".to_string())),
    );

    cell.reject("error".to_string());
    assert_eq!(
        cell.future().await,
        Err(Rejection::Rejected("onReject error".to_string()))
    );
}

#[tokio::test]
async fn async_reject_hook_can_replace_the_error() {
    let cell = SettlementCell::with_options(CellOptions::<Value, String>::new().on_reject(
        |_| async {
            sleep(Duration::from_millis(10)).await;
            Err("onReject error".to_string())
        },
    ));

    cell.reject("error".to_string());
    let err = cell
        .catch(|rejection| json!(rejection.into_error()))
        .await;
    assert_eq!(err, json!("onReject error"));
}

#[tokio::test]
async fn recovery_bypasses_the_resolve_hook() {
    let resolve_calls = Arc::new(AtomicUsize::new(0));
    let spy = Arc::clone(&resolve_calls);
    let cell = SettlementCell::with_options(
        CellOptions::<Value, String>::new()
            .on_resolve_sync(move |value| {
                spy.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
            .on_reject(|_| async { Ok(json!({"ok": 1})) }),
    );

    cell.reject("error".to_string());
    assert_eq!(cell.flags(), SettlementFlags::REJECTED);

    assert_eq!(cell.future().await, Ok(json!({"ok": 1})));
    assert!(cell.is_resolved());
    assert!(!cell.is_rejected());
    assert_eq!(resolve_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn then_maps_the_settled_value() {
    let cell = SettlementCell::<u32, String>::new();
    cell.resolve(20);

    assert_eq!(cell.then(|value| value + 1).await, Ok(21));
}
