mod common;

use common::{add_product, sale_of, setup};
use rust_decimal::Decimal;
use shopsense::domain::error::DomainError;
use shopsense::domain::values::payment_method::PaymentMethod;

#[test]
fn test_summary_counts_completed_sales() {
    let (shop, _dir) = setup();
    let coffee = add_product(&shop, "Coffee", Decimal::new(450, 2), 20);
    let bagel = add_product(&shop, "Bagel", Decimal::from(2), 3);

    let mut by_card = sale_of(&coffee, 3, None);
    by_card.payment_method = PaymentMethod::Card;
    shop.record_sale(by_card).unwrap();
    shop.record_sale(sale_of(&bagel, 2, None)).unwrap();
    let refunded = shop.record_sale(sale_of(&coffee, 1, None)).unwrap();
    shop.cancel_sale(&refunded.id).unwrap();

    let summary = shop.summary(7).unwrap();
    assert_eq!(summary.transactions, 2);
    assert_eq!(summary.revenue, Decimal::new(1750, 2));
    assert_eq!(summary.average_ticket, Decimal::new(875, 2));

    assert_eq!(summary.top_products[0].product_name, "Coffee");
    assert_eq!(summary.top_products[0].units, 3);
    assert_eq!(summary.top_products[1].units, 2);

    assert_eq!(summary.by_payment_method[0].method, PaymentMethod::Card);
    assert_eq!(summary.by_payment_method[0].total, Decimal::new(1350, 2));
    assert_eq!(summary.by_payment_method[1].method, PaymentMethod::Cash);

    assert_eq!(summary.active_products, 2);
    assert_eq!(summary.low_stock_products, 1);
    // 17 × 4.50 + 1 × 2.00
    assert_eq!(summary.inventory_value, Decimal::new(7850, 2));
}

#[test]
fn test_summary_of_empty_store() {
    let (shop, _dir) = setup();
    let summary = shop.summary(30).unwrap();
    assert_eq!(summary.transactions, 0);
    assert_eq!(summary.average_ticket, Decimal::ZERO);
    assert!(summary.top_products.is_empty());
}

#[test]
fn test_summary_needs_a_period() {
    let (shop, _dir) = setup();
    assert!(matches!(shop.summary(0), Err(DomainError::InvalidInput(_))));
}

#[test]
fn test_summary_over_very_long_period() {
    let (shop, _dir) = setup();
    let p = add_product(&shop, "Tea", Decimal::from(3), 10);
    shop.record_sale(sale_of(&p, 1, None)).unwrap();

    let summary = shop.summary(u32::MAX).unwrap();
    assert_eq!(summary.transactions, 1);
}
