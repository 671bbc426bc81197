pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::catalog::{CatalogUseCase, NewProduct};
use crate::application::insights::{Insight, InsightsUseCase};
use crate::application::pricing::{PriceReview, PriceSuggestion, PricingUseCase};
use crate::application::projection::{ProjectionUseCase, RevenueProjection};
use crate::application::sales::{NewSale, SalesUseCase};
use crate::application::summary::{SalesSummary, SummaryUseCase};
use crate::domain::entities::product::Product;
use crate::domain::entities::sale::Sale;
use crate::domain::error::DomainError;
use crate::domain::ports::product_catalog::{ProductCatalog, ProductFilter};
use crate::domain::ports::sales_history::{SaleFilter, SalesHistory};
use crate::domain::values::heuristics::HeuristicsConfig;
use crate::infrastructure::config::load_from_env;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::product_repo::SqliteProductRepo;
use crate::infrastructure::sqlite::sale_repo::SqliteSaleRepo;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct ShopSense {
    config: Arc<HeuristicsConfig>,
    catalog_uc: CatalogUseCase,
    sales_uc: SalesUseCase,
    pricing_uc: PricingUseCase,
    projection_uc: ProjectionUseCase,
    summary_uc: SummaryUseCase,
    insights_uc: InsightsUseCase,
}

fn open_connection(db_path: &str) -> Result<Connection, DomainError> {
    let conn =
        Connection::open(db_path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    Ok(conn)
}

impl ShopSense {
    /// Open the store at `db_path`, with heuristics overrides from `SHOPSENSE_HEURISTICS` if set.
    pub fn new(db_path: &str) -> Result<Self, DomainError> {
        Self::with_config(db_path, load_from_env()?)
    }

    pub fn with_config(db_path: &str, config: HeuristicsConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let conn1 = open_connection(db_path)?;
        let conn2 = open_connection(db_path)?;
        run_migrations(&conn1)?;

        let catalog: Arc<dyn ProductCatalog> = Arc::new(SqliteProductRepo::new(conn1));
        let sales: Arc<dyn SalesHistory> = Arc::new(SqliteSaleRepo::new(conn2));
        let config = Arc::new(config);
        tracing::debug!(db_path, "store opened");

        Ok(Self {
            catalog_uc: CatalogUseCase::new(catalog.clone()),
            sales_uc: SalesUseCase::new(catalog.clone(), sales.clone()),
            pricing_uc: PricingUseCase::new(catalog.clone(), sales.clone(), config.clone()),
            projection_uc: ProjectionUseCase::new(catalog.clone(), sales.clone(), config.clone()),
            summary_uc: SummaryUseCase::new(catalog.clone(), sales.clone()),
            insights_uc: InsightsUseCase::new(catalog, sales, config.clone()),
            config,
        })
    }

    pub fn config(&self) -> &HeuristicsConfig {
        &self.config
    }

    // Catalog
    pub fn add_product(&self, input: NewProduct) -> Result<Product, DomainError> {
        self.catalog_uc.add_product(input)
    }

    pub fn get_product(&self, id: &str) -> Result<Product, DomainError> {
        self.catalog_uc.get(id)
    }

    pub fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        self.catalog_uc.list(filter)
    }

    pub fn low_stock(&self) -> Result<Vec<Product>, DomainError> {
        self.catalog_uc.low_stock()
    }

    pub fn receive_stock(&self, id: &str, units: u32) -> Result<Product, DomainError> {
        self.catalog_uc.receive_stock(id, units)
    }

    pub fn reprice(&self, id: &str, price: Decimal) -> Result<Product, DomainError> {
        self.catalog_uc.reprice(id, price)
    }

    pub fn deactivate(&self, id: &str) -> Result<(), DomainError> {
        self.catalog_uc.deactivate(id)
    }

    // Sales
    pub fn record_sale(&self, input: NewSale) -> Result<Sale, DomainError> {
        self.sales_uc.record_sale(input)
    }

    pub fn complete_sale(&self, id: &str) -> Result<Sale, DomainError> {
        self.sales_uc.complete_sale(id)
    }

    pub fn cancel_sale(&self, id: &str) -> Result<Sale, DomainError> {
        self.sales_uc.cancel_sale(id)
    }

    pub fn get_sale(&self, id: &str) -> Result<Sale, DomainError> {
        self.sales_uc.get(id)
    }

    pub fn list_sales(&self, filter: &SaleFilter) -> Result<Vec<Sale>, DomainError> {
        self.sales_uc.list(filter)
    }

    // Heuristics
    pub fn suggest_prices(&self) -> Result<Vec<PriceSuggestion>, DomainError> {
        self.pricing_uc.suggest_all()
    }

    pub fn suggest_prices_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PriceSuggestion>, DomainError> {
        self.pricing_uc.suggest_all_at(now)
    }

    pub fn review_price(&self, product_id: &str) -> Result<PriceReview, DomainError> {
        self.pricing_uc.review(product_id)
    }

    pub fn project_revenue(&self, days: i64) -> Result<RevenueProjection, DomainError> {
        self.projection_uc.execute(days)
    }

    pub fn project_revenue_at(
        &self,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<RevenueProjection, DomainError> {
        self.projection_uc.execute_at(days, now)
    }

    pub fn summary(&self, days: u32) -> Result<SalesSummary, DomainError> {
        self.summary_uc.execute(days)
    }

    pub fn insights(&self) -> Result<Vec<Insight>, DomainError> {
        self.insights_uc.generate()
    }

    pub fn insights_at(&self, now: DateTime<Utc>) -> Result<Vec<Insight>, DomainError> {
        self.insights_uc.generate_at(now)
    }
}
