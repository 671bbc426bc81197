pub mod product_catalog;
pub mod sales_history;
