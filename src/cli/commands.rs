use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shopsense", about = "Point-of-sale ledger with pricing and revenue heuristics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a product to the catalog
    ProductAdd {
        /// JSON with name, price, code, category, units_on_hand, reorder_threshold, unit
        json: String,
    },
    /// List products
    Products {
        /// Include inactive products
        #[arg(long)]
        all: bool,
        /// Only products at or below their reorder threshold
        #[arg(long)]
        low_stock: bool,
    },
    /// Receive stock for a product
    Receive {
        /// Product ID
        id: String,
        units: u32,
    },
    /// Change a product's price
    Reprice {
        /// Product ID
        id: String,
        /// New price (e.g. 12.50)
        price: String,
    },
    /// Remove a product from sale
    Deactivate {
        /// Product ID
        id: String,
    },
    /// Record a sale
    Sale {
        /// JSON with lines [{product_id, quantity}], discount, payment_method, customer, notes, sold_at, status
        json: String,
    },
    /// Cancel a sale and restock its units
    SaleCancel {
        /// Sale ID
        id: String,
    },
    /// Complete a pending sale
    SaleComplete {
        /// Sale ID
        id: String,
    },
    /// List sales, newest first
    Sales {
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Only sales on or after this date (YYYY-MM-DD or RFC3339)
        #[arg(long)]
        since: Option<String>,
        /// Only sales on or before this date (YYYY-MM-DD or RFC3339)
        #[arg(long)]
        until: Option<String>,
        /// completed, pending or cancelled
        #[arg(long)]
        status: Option<String>,
    },
    /// Sales summary for the last N days
    Summary {
        #[arg(long, default_value = "30")]
        days: u32,
    },
    /// Price suggestions for all active products
    Prices,
    /// Pricing review of one product
    Price {
        /// Product ID
        id: String,
    },
    /// Revenue projection
    Project {
        /// Horizon in days (1-365)
        #[arg(long, default_value = "30", allow_negative_numbers = true)]
        days: i64,
    },
    /// Store insights: forecast, stock alerts, patterns, star products
    Insights,
    /// Print the heuristics configuration in effect
    Config,
}
