pub mod catalog;
pub mod demand;
pub mod insights;
pub mod pricing;
pub mod projection;
pub mod sales;
pub mod summary;
