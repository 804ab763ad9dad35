use engine::{CouponState, EngineError, HistoryKind, MoneyCents};

mod common;

use common::{count_rows, engine_with_db, gift_card, money};

#[tokio::test]
async fn insert_records_created_entry() {
    let engine = engine_with_db().await;

    let coupon = engine.insert(gift_card("Gift Card", "100")).await.unwrap();

    let stored = engine.coupon(coupon.id).await.unwrap().unwrap();
    assert_eq!(stored, coupon);

    let history = engine.history(coupon.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind(), HistoryKind::Created);
    assert_eq!(
        history[0].change_summary,
        "Coupon created with initial value of 100.00"
    );
    assert_eq!(history[0].action.coupon_state().to_coupon(), coupon);
}

#[tokio::test]
async fn duplicate_redeem_code_is_rejected_without_writes() {
    let engine = engine_with_db().await;
    let db = engine.database();
    engine
        .insert(gift_card("Coupon 1", "10").redeem_code("DUPLICATE-CODE"))
        .await
        .unwrap();
    let coupons_before = count_rows(db, "coupons").await;
    let history_before = count_rows(db, "coupon_history").await;

    let err = engine
        .insert(gift_card("Coupon 2", "20").redeem_code("DUPLICATE-CODE"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::DuplicateRedeemCode("DUPLICATE-CODE".to_string())
    );
    assert_eq!(count_rows(db, "coupons").await, coupons_before);
    assert_eq!(count_rows(db, "coupon_history").await, history_before);
}

#[tokio::test]
async fn redeem_code_lookup_is_case_sensitive() {
    let engine = engine_with_db().await;
    engine
        .insert(gift_card("Upper", "10").redeem_code("ABCD-1234"))
        .await
        .unwrap();

    engine
        .insert(gift_card("Lower", "10").redeem_code("abcd-1234"))
        .await
        .unwrap();

    let found = engine.coupon_by_redeem_code("ABCD-1234").await.unwrap();
    assert_eq!(found.unwrap().name, "Upper");
    assert!(
        engine
            .coupon_by_redeem_code("NONEXISTENT")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn blank_and_absent_redeem_codes_never_collide() {
    let engine = engine_with_db().await;

    for name in ["a", "b", "c"] {
        engine
            .insert(gift_card(name, "10").redeem_code(""))
            .await
            .unwrap();
        engine
            .insert(gift_card(name, "10").redeem_code("   "))
            .await
            .unwrap();
        engine.insert(gift_card(name, "10")).await.unwrap();
    }

    assert_eq!(engine.active_coupons().await.unwrap().len(), 9);
}

#[tokio::test]
async fn use_below_balance_keeps_coupon_active() {
    let engine = engine_with_db().await;
    let coupon = engine.insert(gift_card("Gift Card", "100")).await.unwrap();

    let used = engine.use_coupon(&coupon, money("30")).await.unwrap();

    let stored = engine.coupon(coupon.id).await.unwrap().unwrap();
    assert_eq!(stored, used);
    assert_eq!(stored.current_value, money("70"));
    assert!(!stored.is_archived);

    let history = engine.history(coupon.id).await.unwrap();
    assert_eq!(history[0].kind(), HistoryKind::Used);
    assert_eq!(history[0].change_summary, "30.00");
}

#[tokio::test]
async fn use_of_entire_balance_archives() {
    let engine = engine_with_db().await;
    let coupon = engine.insert(gift_card("Gift Card", "50")).await.unwrap();

    engine.use_coupon(&coupon, money("50")).await.unwrap();

    let stored = engine.coupon(coupon.id).await.unwrap().unwrap();
    assert_eq!(stored.current_value, MoneyCents::ZERO);
    assert!(stored.is_archived);
    assert_eq!(stored.state(), CouponState::Archived);
}

#[tokio::test]
async fn overdraw_goes_negative_and_archives() {
    let engine = engine_with_db().await;
    let coupon = engine.insert(gift_card("Gift Card", "50")).await.unwrap();

    engine.use_coupon(&coupon, money("75")).await.unwrap();

    let stored = engine.coupon(coupon.id).await.unwrap().unwrap();
    assert_eq!(stored.current_value, money("-25"));
    assert!(stored.is_archived);
    assert!(engine.active_coupons().await.unwrap().is_empty());
    assert_eq!(engine.archived_coupons().await.unwrap().len(), 1);
}

#[tokio::test]
async fn archive_then_unarchive_restores_the_coupon() {
    let engine = engine_with_db().await;
    let coupon = engine.insert(gift_card("Gift Card", "100")).await.unwrap();

    engine.archive(&coupon).await.unwrap();
    let archived = engine.coupon(coupon.id).await.unwrap().unwrap();
    assert!(archived.is_archived);

    engine.unarchive(&archived).await.unwrap();
    let restored = engine.coupon(coupon.id).await.unwrap().unwrap();
    assert_eq!(restored, coupon);

    let kinds: Vec<_> = engine
        .history(coupon.id)
        .await
        .unwrap()
        .iter()
        .map(|entry| entry.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            HistoryKind::Unarchived,
            HistoryKind::Archived,
            HistoryKind::Created
        ]
    );
}

#[tokio::test]
async fn update_without_changes_records_no_changes() {
    let engine = engine_with_db().await;
    let coupon = engine.insert(gift_card("Gift Card", "100")).await.unwrap();

    engine.update(&coupon).await.unwrap();

    let history = engine.history(coupon.id).await.unwrap();
    assert_eq!(history[0].kind(), HistoryKind::Edited);
    assert_eq!(history[0].change_summary, "No changes");
}

#[tokio::test]
async fn update_records_diff_and_previous_state() {
    let engine = engine_with_db().await;
    let coupon = engine.insert(gift_card("Coffee", "40")).await.unwrap();

    let mut edited = coupon.clone();
    edited.name = "Tea".to_string();
    edited.current_value = money("12.5");
    engine.update(&edited).await.unwrap();

    assert_eq!(engine.coupon(coupon.id).await.unwrap().unwrap(), edited);
    let history = engine.history(coupon.id).await.unwrap();
    assert_eq!(
        history[0].change_summary,
        "Name changed from 'Coffee' to 'Tea', Balance changed from 40.00 to 12.50"
    );
    assert_eq!(history[0].action.coupon_state().to_coupon(), coupon);
}

#[tokio::test]
async fn missing_coupon_mutations_are_silent_noops() {
    let engine = engine_with_db().await;
    let db = engine.database();
    let coupon = engine.insert(gift_card("Gift Card", "100")).await.unwrap();
    engine.delete(&coupon).await.unwrap();

    engine.update(&coupon).await.unwrap();
    engine.archive(&coupon).await.unwrap();
    engine.unarchive(&coupon).await.unwrap();
    engine.use_coupon(&coupon, money("10")).await.unwrap();
    engine.approve(&coupon).await.unwrap();
    engine.delete(&coupon).await.unwrap();

    assert_eq!(count_rows(db, "coupons").await, 0);
    assert_eq!(count_rows(db, "coupon_history").await, 0);
}

#[tokio::test]
async fn delete_cascades_only_its_own_history() {
    let engine = engine_with_db().await;
    let db = engine.database();
    let doomed = engine.insert(gift_card("Doomed", "100")).await.unwrap();
    let kept = engine.insert(gift_card("Kept", "100")).await.unwrap();
    engine.use_coupon(&doomed, money("10")).await.unwrap();
    engine.use_coupon(&kept, money("10")).await.unwrap();

    engine.delete(&doomed).await.unwrap();

    assert!(engine.coupon(doomed.id).await.unwrap().is_none());
    assert!(engine.history(doomed.id).await.unwrap().is_empty());
    assert_eq!(engine.history(kept.id).await.unwrap().len(), 2);
    assert_eq!(count_rows(db, "coupon_history").await, 2);
}

#[tokio::test]
async fn approve_moves_pending_coupon_to_active() {
    let engine = engine_with_db().await;
    let draft = engine
        .insert(gift_card("Scanned", "25").pending())
        .await
        .unwrap();
    assert_eq!(engine.pending_coupons().await.unwrap(), vec![draft.clone()]);
    assert!(engine.active_coupons().await.unwrap().is_empty());

    engine.approve(&draft).await.unwrap();

    let stored = engine.coupon(draft.id).await.unwrap().unwrap();
    assert!(!stored.is_pending);
    assert!(engine.pending_coupons().await.unwrap().is_empty());
    assert_eq!(engine.active_coupons().await.unwrap(), vec![stored]);
}

#[tokio::test]
async fn reject_pending_removes_draft_and_history() {
    let engine = engine_with_db().await;
    let db = engine.database();
    let draft = engine
        .insert(gift_card("Scanned", "25").pending())
        .await
        .unwrap();

    engine.reject_pending(&draft).await.unwrap();

    assert!(engine.coupon(draft.id).await.unwrap().is_none());
    assert!(engine.pending_coupons().await.unwrap().is_empty());
    assert_eq!(count_rows(db, "coupon_history").await, 0);
}

#[tokio::test]
async fn reject_pending_leaves_active_coupons_alone() {
    let engine = engine_with_db().await;
    let coupon = engine.insert(gift_card("Active", "25")).await.unwrap();

    engine.reject_pending(&coupon).await.unwrap();

    assert!(engine.coupon(coupon.id).await.unwrap().is_some());
}

#[tokio::test]
async fn listings_partition_coupons_by_state() {
    let engine = engine_with_db().await;
    let active = engine.insert(gift_card("Active", "10")).await.unwrap();
    let archived = engine.insert(gift_card("Archived", "10")).await.unwrap();
    engine.archive(&archived).await.unwrap();
    let pending = engine
        .insert(gift_card("Pending", "10").pending())
        .await
        .unwrap();

    let names = |coupons: Vec<engine::Coupon>| {
        coupons.into_iter().map(|c| c.name).collect::<Vec<_>>()
    };
    assert_eq!(names(engine.active_coupons().await.unwrap()), vec![active.name]);
    assert_eq!(
        names(engine.archived_coupons().await.unwrap()),
        vec![archived.name]
    );
    assert_eq!(
        names(engine.pending_coupons().await.unwrap()),
        vec![pending.name]
    );
}

#[tokio::test]
async fn use_rejects_balance_overflow_without_writes() {
    let engine = engine_with_db().await;
    let coupon = engine.insert(gift_card("Gift Card", "10")).await.unwrap();
    let huge = MoneyCents::new(i64::MAX);

    let once = engine.use_coupon(&coupon, huge).await.unwrap();
    assert!(once.is_archived);

    let err = engine.use_coupon(&once, huge).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let stored = engine.coupon(coupon.id).await.unwrap().unwrap();
    assert_eq!(stored, once);
    assert_eq!(engine.history(coupon.id).await.unwrap().len(), 2);
}
