use std::time::Duration;

use tokio::time::sleep;

use settle_cell::{CellOptions, Rejection, SettlementCell, SettlementFlags, SettlementState};

#[tokio::test]
async fn new_cell_has_all_flags_cleared() {
    let cell = SettlementCell::<String, String>::new();

    assert!(!cell.is_fulfilled());
    assert!(!cell.is_resolved());
    assert!(!cell.is_rejected());
    assert_eq!(cell.state(), SettlementState::Open);
    assert!(!cell.is_settled());
}

#[tokio::test]
async fn resolve_sets_resolved_flags() {
    let cell = SettlementCell::<Option<u8>, String>::new();

    assert_eq!(cell.resolve(None).future().await, Ok(None));
    assert_eq!(cell.flags(), SettlementFlags::RESOLVED);
    assert_eq!(cell.state(), SettlementState::SettledResolved);
}

#[tokio::test]
async fn reject_sets_rejected_flags() {
    let cell = SettlementCell::<u8, String>::new();

    let outcome = cell.reject("nope".to_string()).future().await;
    assert_eq!(outcome, Err(Rejection::Rejected("nope".to_string())));
    assert!(cell.is_fulfilled());
    assert!(!cell.is_resolved());
    assert!(cell.is_rejected());
    assert_eq!(cell.state(), SettlementState::SettledRejected);
}

#[tokio::test]
async fn flags_reflect_intent_before_a_slow_hook_settles() {
    let cell = SettlementCell::with_options(CellOptions::<u32, String>::new().on_resolve(
        |value| async move {
            sleep(Duration::from_millis(50)).await;
            Ok(value + 1)
        },
    ));

    cell.resolve(1);
    assert_eq!(cell.flags(), SettlementFlags::RESOLVED);
    assert!(!cell.is_settled());

    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
    assert_eq!(cell.state(), SettlementState::CommittedResolve);

    assert_eq!(cell.future().await, Ok(2));
    assert!(cell.is_settled());
}

#[tokio::test]
async fn fulfilled_flag_never_reverts_once_set() {
    let cell = SettlementCell::with_options(
        CellOptions::<u32, String>::new()
            .on_resolve_sync(|_| Err("first".to_string()))
            .on_reject_sync(|error| Err(format!("{error}+second"))),
    );

    cell.resolve(3);
    let mut seen = vec![cell.flags()];
    let reader = cell.future();
    tokio::pin!(reader);
    let outcome = loop {
        tokio::select! {
            outcome = &mut reader => break outcome,
            _ = tokio::task::yield_now() => seen.push(cell.flags()),
        }
    };
    seen.push(cell.flags());

    assert_eq!(outcome, Err(Rejection::Rejected("first+second".to_string())));
    assert!(seen.iter().all(|flags| flags.fulfilled));
    assert!(seen.iter().all(|flags| !(flags.resolved && flags.rejected)));
    assert_eq!(seen.last(), Some(&SettlementFlags::REJECTED));
}
