use crate::domain::entities::product::Product;
use crate::domain::values::payment_method::PaymentMethod;
use crate::domain::values::sale_status::SaleStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    /// Name at the time of sale, kept even if the product is renamed later.
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl SaleLine {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            line_total: product.price * Decimal::from(quantity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub sale_number: String,
    pub sold_at: DateTime<Utc>,
    pub status: SaleStatus,
    pub customer: Option<String>,
    pub lines: Vec<SaleLine>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    pub fn new(
        lines: Vec<SaleLine>,
        discount: Decimal,
        payment_method: PaymentMethod,
        customer: Option<String>,
        notes: Option<String>,
        sold_at: DateTime<Utc>,
    ) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let sale_number = format!(
            "S-{}-{}",
            sold_at.format("%Y%m%d"),
            id[..8].to_uppercase()
        );
        let subtotal: Decimal = lines.iter().map(|l| l.line_total).sum();
        let total = (subtotal - discount).max(Decimal::ZERO);
        Self {
            id,
            sale_number,
            sold_at,
            status: SaleStatus::Completed,
            customer,
            lines,
            subtotal,
            discount,
            total,
            payment_method,
            notes,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SaleStatus::Completed
    }

    /// Units of `product_id` across all lines of this sale.
    pub fn units_of(&self, product_id: &str) -> u64 {
        self.lines
            .iter()
            .filter(|l| l.product_id == product_id)
            .map(|l| l.quantity as u64)
            .sum()
    }
}
