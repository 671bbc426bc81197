use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Shelf code, unique across the catalog.
    pub code: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub units_on_hand: u32,
    /// Stock level at or below which the product is at risk of running out.
    pub reorder_threshold: u32,
    /// Unit of measure shown next to quantities ("unit", "kg", ...).
    pub unit: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        code: String,
        name: String,
        category: String,
        price: Decimal,
        units_on_hand: u32,
        reorder_threshold: u32,
        unit: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code,
            name,
            category,
            price,
            units_on_hand,
            reorder_threshold,
            unit,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_below_reorder(&self) -> bool {
        self.units_on_hand <= self.reorder_threshold
    }

    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.units_on_hand)
    }
}
