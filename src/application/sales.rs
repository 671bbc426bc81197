use crate::domain::entities::product::Product;
use crate::domain::entities::sale::{Sale, SaleLine};
use crate::domain::error::DomainError;
use crate::domain::ports::product_catalog::ProductCatalog;
use crate::domain::ports::sales_history::{SaleFilter, SalesHistory};
use crate::domain::values::payment_method::PaymentMethod;
use crate::domain::values::sale_status::SaleStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct NewSaleLine {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub lines: Vec<NewSaleLine>,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub customer: Option<String>,
    pub notes: Option<String>,
    /// Backdates the sale; defaults to now.
    pub sold_at: Option<DateTime<Utc>>,
    /// `completed` (default) or `pending`.
    pub status: Option<SaleStatus>,
}

pub struct SalesUseCase {
    catalog: Arc<dyn ProductCatalog>,
    sales: Arc<dyn SalesHistory>,
}

impl SalesUseCase {
    pub fn new(catalog: Arc<dyn ProductCatalog>, sales: Arc<dyn SalesHistory>) -> Self {
        Self { catalog, sales }
    }

    pub fn record_sale(&self, input: NewSale) -> Result<Sale, DomainError> {
        if input.lines.is_empty() {
            return Err(DomainError::InvalidInput("A sale needs at least one line".into()));
        }
        if input.discount < Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "Discount must not be negative, got {}",
                input.discount
            )));
        }
        let status = input.status.unwrap_or_default();
        if status == SaleStatus::Cancelled {
            return Err(DomainError::InvalidInput(
                "A new sale must be completed or pending".into(),
            ));
        }
        let now = Utc::now();
        let sold_at = input.sold_at.unwrap_or(now);
        if sold_at > now {
            return Err(DomainError::InvalidInput(format!(
                "Sale date {sold_at} is in the future"
            )));
        }

        let mut products: HashMap<String, Product> = HashMap::new();
        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            if line.quantity == 0 {
                return Err(DomainError::InvalidInput(format!(
                    "Quantity for product {} must be at least 1",
                    line.product_id
                )));
            }
            if !products.contains_key(&line.product_id) {
                let product = self
                    .catalog
                    .get_product(&line.product_id)?
                    .filter(|p| p.active)
                    .ok_or_else(|| {
                        DomainError::InvalidInput(format!(
                            "Product not found or inactive: {}",
                            line.product_id
                        ))
                    })?;
                products.insert(line.product_id.clone(), product);
            }
            if let Some(product) = products.get(&line.product_id) {
                lines.push(SaleLine::new(product, line.quantity));
            }
        }

        let mut sale = Sale::new(
            lines,
            input.discount,
            input.payment_method,
            input.customer,
            input.notes,
            sold_at,
        );
        sale.status = status;

        let remaining = remaining_stock(&sale, &products)?;
        self.sales.add_sale(&sale)?;
        if sale.is_completed() {
            self.apply_stock(&remaining)?;
        }

        tracing::info!(
            sale_number = %sale.sale_number,
            status = %sale.status,
            total = %sale.total,
            lines = sale.lines.len(),
            "sale recorded"
        );
        Ok(sale)
    }

    /// Move a pending sale to completed, taking its units out of stock.
    pub fn complete_sale(&self, id: &str) -> Result<Sale, DomainError> {
        let mut sale = self.get(id)?;
        if sale.status != SaleStatus::Pending {
            return Err(DomainError::InvalidInput(format!(
                "Only pending sales can be completed; {} is {}",
                sale.sale_number, sale.status
            )));
        }

        let mut products: HashMap<String, Product> = HashMap::new();
        for line in &sale.lines {
            if !products.contains_key(&line.product_id) {
                let product = self.catalog.get_product(&line.product_id)?.ok_or_else(|| {
                    DomainError::NotFound(format!("Product not found: {}", line.product_id))
                })?;
                products.insert(line.product_id.clone(), product);
            }
        }
        let remaining = remaining_stock(&sale, &products)?;

        self.sales.set_status(id, SaleStatus::Completed)?;
        self.apply_stock(&remaining)?;
        sale.status = SaleStatus::Completed;
        tracing::info!(sale_number = %sale.sale_number, "sale completed");
        Ok(sale)
    }

    /// Cancel a sale. Units of a completed sale go back into stock.
    pub fn cancel_sale(&self, id: &str) -> Result<Sale, DomainError> {
        let mut sale = self.get(id)?;
        if sale.status == SaleStatus::Cancelled {
            return Err(DomainError::InvalidInput(format!(
                "Sale {} is already cancelled",
                sale.sale_number
            )));
        }

        self.sales.set_status(id, SaleStatus::Cancelled)?;
        if sale.is_completed() {
            for line in &sale.lines {
                // Products removed from the catalog since the sale have nothing to restock.
                let Some(product) = self.catalog.get_product(&line.product_id)? else {
                    tracing::warn!(
                        product_id = %line.product_id,
                        "restock skipped, product missing"
                    );
                    continue;
                };
                let on_hand = product.units_on_hand.saturating_add(line.quantity);
                self.catalog.set_stock(&product.id, on_hand)?;
            }
        }
        sale.status = SaleStatus::Cancelled;
        tracing::info!(sale_number = %sale.sale_number, "sale cancelled");
        Ok(sale)
    }

    pub fn get(&self, id: &str) -> Result<Sale, DomainError> {
        self.sales
            .get_sale(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Sale not found: {id}")))
    }

    pub fn list(&self, filter: &SaleFilter) -> Result<Vec<Sale>, DomainError> {
        self.sales.list_sales(filter)
    }

    fn apply_stock(&self, remaining: &[(String, u32)]) -> Result<(), DomainError> {
        for (product_id, on_hand) in remaining {
            self.catalog.set_stock(product_id, *on_hand)?;
        }
        Ok(())
    }
}

/// Stock left per product once `sale` is taken out, or `InvalidInput` if any runs short.
fn remaining_stock(
    sale: &Sale,
    products: &HashMap<String, Product>,
) -> Result<Vec<(String, u32)>, DomainError> {
    let mut remaining = Vec::new();
    for (product_id, product) in products {
        let wanted = sale.units_of(product_id);
        let on_hand = u64::from(product.units_on_hand);
        if wanted > on_hand {
            return Err(DomainError::InvalidInput(format!(
                "Insufficient stock for {}: {} requested, {} on hand",
                product.name, wanted, on_hand
            )));
        }
        // wanted <= on_hand, so the difference fits in u32
        remaining.push((product_id.clone(), (on_hand - wanted) as u32));
    }
    Ok(remaining)
}
