use crate::domain::entities::sale::Sale;
use crate::domain::error::DomainError;
use crate::domain::values::sale_status::SaleStatus;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub status: Option<SaleStatus>,
    pub limit: Option<usize>,
}

impl SaleFilter {
    /// Completed sales sold at or after `since`.
    pub fn completed_since(since: DateTime<Utc>) -> Self {
        Self {
            since: Some(since),
            status: Some(SaleStatus::Completed),
            ..Default::default()
        }
    }
}

/// Source of recorded sales, newest first.
pub trait SalesHistory: Send + Sync {
    fn add_sale(&self, sale: &Sale) -> Result<(), DomainError>;
    fn get_sale(&self, id: &str) -> Result<Option<Sale>, DomainError>;
    fn set_status(&self, id: &str, status: SaleStatus) -> Result<(), DomainError>;
    fn list_sales(&self, filter: &SaleFilter) -> Result<Vec<Sale>, DomainError>;
}
