mod common;

use common::{add_product, sell_days_ago, setup};
use rust_decimal::Decimal;
use shopsense::domain::error::DomainError;
use shopsense::domain::values::confidence::ConfidenceLevel;
use shopsense::domain::values::demand::{DemandLevel, Trend};

#[test]
fn test_suggests_only_products_that_should_move() {
    let (shop, _dir) = setup();
    let hot = add_product(&shop, "Cold Brew", Decimal::from(10), 500);
    let steady = add_product(&shop, "Espresso", Decimal::from(10), 500);
    sell_days_ago(&shop, &hot, 40, 40);
    sell_days_ago(&shop, &hot, 60, 3);
    sell_days_ago(&shop, &steady, 25, 40);
    sell_days_ago(&shop, &steady, 25, 3);

    let suggestions = shop.suggest_prices().unwrap();
    assert_eq!(suggestions.len(), 1);
    let s = &suggestions[0];
    assert_eq!(s.product_id, hot.id);
    assert_eq!(s.suggested_price, Decimal::new(1150, 2));
    assert_eq!(s.demand, DemandLevel::High);
    assert_eq!(s.trend, Trend::Growing);
    assert_eq!(s.confidence, ConfidenceLevel::High);
}

#[test]
fn test_cancelled_sales_do_not_drive_prices() {
    let (shop, _dir) = setup();
    let p = add_product(&shop, "Matcha", Decimal::from(10), 500);
    let big = sell_days_ago(&shop, &p, 90, 3);
    shop.cancel_sale(&big.id).unwrap();

    assert!(shop.suggest_prices().unwrap().is_empty());
}

#[test]
fn test_review_single_product() {
    let (shop, _dir) = setup();
    let p = add_product(&shop, "Chai", Decimal::from(4), 500);
    sell_days_ago(&shop, &p, 30, 40);
    sell_days_ago(&shop, &p, 15, 2);

    let review = shop.review_price(&p.id).unwrap();
    assert_eq!(review.assessment.level, DemandLevel::Low);
    assert_eq!(review.assessment.trend, Trend::Declining);
    assert_eq!(review.assessment.recent_units, 15);
    assert_eq!(review.assessment.prior_units, 30);
    assert_eq!(review.suggestion.unwrap().suggested_price, Decimal::new(340, 2));
}

#[test]
fn test_review_without_history_has_no_suggestion() {
    let (shop, _dir) = setup();
    let p = add_product(&shop, "Cocoa", Decimal::from(5), 10);

    let review = shop.review_price(&p.id).unwrap();
    assert_eq!(review.assessment.level, DemandLevel::Low);
    assert_eq!(review.assessment.trend, Trend::Stable);
    assert!(review.suggestion.is_none());
}

#[test]
fn test_review_unknown_or_inactive_product() {
    let (shop, _dir) = setup();
    assert!(matches!(shop.review_price("ghost"), Err(DomainError::NotFound(_))));

    let p = add_product(&shop, "Old Blend", Decimal::from(5), 10);
    shop.deactivate(&p.id).unwrap();
    assert!(matches!(shop.review_price(&p.id), Err(DomainError::NotFound(_))));
}
