use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use crate::domain::ports::product_catalog::{ProductCatalog, ProductFilter};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

/// Product as entered at the counter. Omitted fields fall back to sensible defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Defaults to a slug of the name.
    pub code: Option<String>,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub units_on_hand: u32,
    #[serde(default = "default_reorder_threshold")]
    pub reorder_threshold: u32,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_reorder_threshold() -> u32 {
    5
}

fn default_unit() -> String {
    "unit".to_string()
}

pub struct CatalogUseCase {
    catalog: Arc<dyn ProductCatalog>,
}

impl CatalogUseCase {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    pub fn add_product(&self, input: NewProduct) -> Result<Product, DomainError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Product name must not be empty".into()));
        }
        if input.price < Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "Price must not be negative, got {}",
                input.price
            )));
        }
        let code = match input.code.map(|c| c.trim().to_string()) {
            Some(c) if !c.is_empty() => c,
            _ => name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-"),
        };

        let product = Product::new(
            code,
            name,
            input.category,
            input.price,
            input.units_on_hand,
            input.reorder_threshold,
            input.unit,
        );
        self.catalog.add_product(&product)?;
        tracing::info!(id = %product.id, code = %product.code, "product added");
        Ok(product)
    }

    pub fn get(&self, id: &str) -> Result<Product, DomainError> {
        self.catalog
            .get_product(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Product not found: {id}")))
    }

    pub fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        self.catalog.list_products(filter)
    }

    /// Active products at or below their reorder threshold.
    pub fn low_stock(&self) -> Result<Vec<Product>, DomainError> {
        self.catalog.list_products(&ProductFilter {
            active_only: true,
            below_reorder_only: true,
        })
    }

    /// Record a reception of `units` into stock.
    pub fn receive_stock(&self, id: &str, units: u32) -> Result<Product, DomainError> {
        if units == 0 {
            return Err(DomainError::InvalidInput("Received units must be positive".into()));
        }
        let mut product = self.get(id)?;
        let on_hand = product.units_on_hand.checked_add(units).ok_or_else(|| {
            DomainError::InvalidInput(format!("Stock for {} would overflow", product.name))
        })?;
        self.catalog.set_stock(id, on_hand)?;
        tracing::info!(id, received = units, on_hand, "stock received");
        product.units_on_hand = on_hand;
        Ok(product)
    }

    pub fn reprice(&self, id: &str, price: Decimal) -> Result<Product, DomainError> {
        if price < Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "Price must not be negative, got {price}"
            )));
        }
        let mut product = self.get(id)?;
        self.catalog.set_price(id, price)?;
        tracing::info!(id, old = %product.price, new = %price, "product repriced");
        product.price = price;
        Ok(product)
    }

    pub fn deactivate(&self, id: &str) -> Result<(), DomainError> {
        self.catalog.set_active(id, false)?;
        tracing::info!(id, "product deactivated");
        Ok(())
    }
}
