//! Shared test helpers.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use shopsense::application::catalog::NewProduct;
use shopsense::application::sales::{NewSale, NewSaleLine};
use shopsense::domain::entities::product::Product;
use shopsense::domain::entities::sale::Sale;
use shopsense::domain::values::heuristics::HeuristicsConfig;
use shopsense::domain::values::payment_method::PaymentMethod;
use shopsense::ShopSense;
use tempfile::TempDir;

/// A store backed by a fresh database file. Keep the `TempDir` alive for the test.
pub fn setup() -> (ShopSense, TempDir) {
    setup_with(HeuristicsConfig::default())
}

pub fn setup_with(config: HeuristicsConfig) -> (ShopSense, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.db");
    let shop = ShopSense::with_config(path.to_str().unwrap(), config).unwrap();
    (shop, dir)
}

pub fn new_product(name: &str, price: Decimal, units_on_hand: u32) -> NewProduct {
    NewProduct {
        code: None,
        name: name.to_string(),
        category: "general".to_string(),
        price,
        units_on_hand,
        reorder_threshold: 5,
        unit: "unit".to_string(),
    }
}

pub fn add_product(shop: &ShopSense, name: &str, price: Decimal, units_on_hand: u32) -> Product {
    shop.add_product(new_product(name, price, units_on_hand)).unwrap()
}

pub fn sale_of(product: &Product, quantity: u32, sold_at: Option<DateTime<Utc>>) -> NewSale {
    NewSale {
        lines: vec![NewSaleLine {
            product_id: product.id.clone(),
            quantity,
        }],
        discount: Decimal::ZERO,
        payment_method: PaymentMethod::Cash,
        customer: None,
        notes: None,
        sold_at,
        status: None,
    }
}

/// Record a completed sale `days` days (plus an hour) in the past.
pub fn sell_days_ago(shop: &ShopSense, product: &Product, quantity: u32, days: i64) -> Sale {
    let at = Utc::now() - Duration::days(days) - Duration::hours(1);
    shop.record_sale(sale_of(product, quantity, Some(at))).unwrap()
}
