use crate::domain::entities::sale::Sale;
use crate::domain::error::DomainError;
use crate::domain::ports::product_catalog::{ProductCatalog, ProductFilter};
use crate::domain::ports::sales_history::{SaleFilter, SalesHistory};
use crate::domain::values::money::round_money;
use crate::domain::values::payment_method::PaymentMethod;
use crate::domain::values::window::TrailingWindows;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Serialize)]
pub struct SalesSummary {
    pub generated_at: DateTime<Utc>,
    pub period_days: u32,
    pub transactions: usize,
    pub revenue: Decimal,
    pub average_ticket: Decimal,
    pub top_products: Vec<ProductSales>,
    pub by_payment_method: Vec<PaymentBreakdown>,
    pub active_products: usize,
    pub low_stock_products: usize,
    pub inventory_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    pub units: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub transactions: usize,
    pub total: Decimal,
}

/// Per-product units and line revenue across `sales`, in first-seen order.
pub fn product_totals<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Vec<ProductSales> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ProductSales> = Vec::new();
    for line in sales.into_iter().flat_map(|s| s.lines.iter()) {
        let slot = *index.entry(line.product_id.as_str()).or_insert_with(|| {
            totals.push(ProductSales {
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                units: 0,
                revenue: Decimal::ZERO,
            });
            totals.len() - 1
        });
        totals[slot].units += line.quantity as u64;
        totals[slot].revenue += line.line_total;
    }
    totals
}

pub struct SummaryUseCase {
    catalog: Arc<dyn ProductCatalog>,
    sales: Arc<dyn SalesHistory>,
}

impl SummaryUseCase {
    pub fn new(catalog: Arc<dyn ProductCatalog>, sales: Arc<dyn SalesHistory>) -> Self {
        Self { catalog, sales }
    }

    pub fn execute(&self, days: u32) -> Result<SalesSummary, DomainError> {
        if days == 0 {
            return Err(DomainError::InvalidInput(
                "Summary period must be at least one day".into(),
            ));
        }
        let now = Utc::now();
        let sales = self
            .sales
            .list_sales(&SaleFilter::completed_since(TrailingWindows::new(now, days).start_of(1)))?;

        let revenue: Decimal = sales.iter().map(|s| s.total).sum();
        let average_ticket = if sales.is_empty() {
            Decimal::ZERO
        } else {
            round_money(revenue / Decimal::from(sales.len() as u64))
        };

        let mut top_products = product_totals(&sales);
        top_products.sort_by(|a, b| {
            b.units
                .cmp(&a.units)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        top_products.truncate(TOP_PRODUCTS);

        let mut by_method: HashMap<PaymentMethod, PaymentBreakdown> = HashMap::new();
        for sale in &sales {
            let entry = by_method
                .entry(sale.payment_method)
                .or_insert_with(|| PaymentBreakdown {
                    method: sale.payment_method,
                    transactions: 0,
                    total: Decimal::ZERO,
                });
            entry.transactions += 1;
            entry.total += sale.total;
        }
        let mut by_payment_method: Vec<PaymentBreakdown> = by_method.into_values().collect();
        by_payment_method.sort_by(|a, b| b.total.cmp(&a.total));

        let products = self.catalog.list_products(&ProductFilter::active())?;
        let low_stock_products = products.iter().filter(|p| p.is_below_reorder()).count();
        let inventory_value: Decimal = products.iter().map(|p| p.stock_value()).sum();

        Ok(SalesSummary {
            generated_at: now,
            period_days: days,
            transactions: sales.len(),
            revenue,
            average_ticket,
            top_products,
            by_payment_method,
            active_products: products.len(),
            low_stock_products,
            inventory_value,
        })
    }
}
