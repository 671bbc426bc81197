use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub active_only: bool,
    /// Only products whose stock is at or below their reorder threshold.
    pub below_reorder_only: bool,
}

impl ProductFilter {
    pub fn active() -> Self {
        Self {
            active_only: true,
            below_reorder_only: false,
        }
    }
}

/// Current product snapshots: prices, stock and reorder thresholds.
pub trait ProductCatalog: Send + Sync {
    fn add_product(&self, product: &Product) -> Result<(), DomainError>;
    fn get_product(&self, id: &str) -> Result<Option<Product>, DomainError>;
    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError>;
    /// Active products at or below their reorder threshold.
    fn count_below_reorder(&self) -> Result<usize, DomainError>;
    fn set_stock(&self, id: &str, units_on_hand: u32) -> Result<(), DomainError>;
    fn set_price(&self, id: &str, price: Decimal) -> Result<(), DomainError>;
    fn set_active(&self, id: &str, active: bool) -> Result<(), DomainError>;
}
