use engine::{EngineError, MoneyCents};

mod common;

use common::{engine_with_db, gift_card, money};

#[tokio::test]
async fn categories_are_unique_ignoring_case_and_accents() {
    let engine = engine_with_db().await;
    engine
        .new_category("Café", "#FF0000", "Restaurant")
        .await
        .unwrap();

    let err = engine
        .new_category("  CAFE ", "#00FF00", "Grocery")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("CAFE".to_string()));

    let err = engine.new_category("   ", "#000000", "Grocery").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("category name must not be empty".to_string())
    );
}

#[tokio::test]
async fn categories_are_listed_by_name() {
    let engine = engine_with_db().await;
    engine.new_category("Travel", "#111111", "Plane").await.unwrap();
    engine.new_category("Food", "#222222", "Restaurant").await.unwrap();

    let names: Vec<_> = engine
        .categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Food", "Travel"]);
}

#[tokio::test]
async fn rename_category_checks_conflicts() {
    let engine = engine_with_db().await;
    let food = engine.new_category("Food", "#222222", "Restaurant").await.unwrap();
    engine.new_category("Travel", "#111111", "Plane").await.unwrap();

    let err = engine.rename_category(food.id, "travel").await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("travel".to_string()));

    engine.rename_category(food.id, "Groceries").await.unwrap();
    let renamed = engine.category(food.id).await.unwrap().unwrap();
    assert_eq!(renamed.name, "Groceries");
    assert_eq!(renamed.color_hex, "#222222");

    let err = engine.rename_category(999, "Nope").await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("category not exists".to_string()));
}

#[tokio::test]
async fn deleting_a_category_uncategorizes_its_coupons() {
    let engine = engine_with_db().await;
    let food = engine.new_category("Food", "#222222", "Restaurant").await.unwrap();
    let coupon = engine
        .insert(gift_card("Pizza", "30").category(food.id))
        .await
        .unwrap();

    engine.delete_category(food.id).await.unwrap();

    let stored = engine.coupon(coupon.id).await.unwrap().unwrap();
    assert_eq!(stored.category_id, None);
    assert!(engine.categories().await.unwrap().is_empty());
    assert_eq!(engine.history(coupon.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn dashboard_sums_balances_and_spending() {
    let engine = engine_with_db().await;
    let food = engine.new_category("Food", "#222222", "Restaurant").await.unwrap();
    let travel = engine.new_category("Travel", "#111111", "Plane").await.unwrap();

    let pizza = engine
        .insert(gift_card("Pizza", "30").category(food.id))
        .await
        .unwrap();
    let train = engine
        .insert(gift_card("Train", "100").category(travel.id))
        .await
        .unwrap();
    let misc = engine.insert(gift_card("Misc", "20")).await.unwrap();
    engine
        .insert(gift_card("Draft", "500").current_value(money("0")).pending())
        .await
        .unwrap();

    engine.use_coupon(&pizza, money("30")).await.unwrap();
    engine.use_coupon(&train, money("10")).await.unwrap();
    engine.use_coupon(&misc, money("5")).await.unwrap();

    let dashboard = engine.dashboard().await.unwrap();
    assert_eq!(dashboard.total_balance, money("105"));
    assert_eq!(dashboard.total_spent, money("45"));

    let spending: Vec<_> = dashboard
        .spending_by_category
        .iter()
        .map(|s| (s.name.as_str(), s.total_spent))
        .collect();
    assert_eq!(
        spending,
        vec![
            ("Food", money("30")),
            ("Travel", money("10")),
            ("Uncategorized", money("5")),
        ]
    );
}

#[tokio::test]
async fn dashboard_reports_overflowing_totals() {
    let engine = engine_with_db().await;
    for name in ["Big", "Bigger"] {
        engine
            .insert(gift_card(name, "1").current_value(MoneyCents::new(i64::MAX)))
            .await
            .unwrap();
    }

    let err = engine.dashboard().await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}
