use clap::Parser;
use rust_decimal::Decimal;
use shopsense::application::catalog::NewProduct;
use shopsense::application::sales::NewSale;
use shopsense::cli::commands::{Cli, Commands};
use shopsense::domain::ports::product_catalog::ProductFilter;
use shopsense::domain::ports::sales_history::SaleFilter;
use shopsense::domain::values::sale_status::SaleStatus;
use shopsense::ShopSense;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so stdout stays pure JSON.
    let filter = std::env::var("SHOPSENSE_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let db_path = std::env::var("SHOPSENSE_DB").unwrap_or_else(|_| "./shopsense.db".into());

    let shop = match ShopSense::new(&db_path) {
        Ok(shop) => shop,
        Err(e) => {
            eprintln!("Error initializing ShopSense: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(shop, cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_command(shop: ShopSense, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::ProductAdd { json } => {
            let input: NewProduct = serde_json::from_str(&json)?;
            print_json(&shop.add_product(input)?)?;
        }
        Commands::Products { all, low_stock } => {
            let filter = ProductFilter {
                active_only: !all,
                below_reorder_only: low_stock,
            };
            print_json(&shop.list_products(&filter)?)?;
        }
        Commands::Receive { id, units } => {
            print_json(&shop.receive_stock(&id, units)?)?;
        }
        Commands::Reprice { id, price } => {
            let price =
                Decimal::from_str(&price).map_err(|e| format!("Invalid price {price}: {e}"))?;
            print_json(&shop.reprice(&id, price)?)?;
        }
        Commands::Deactivate { id } => {
            shop.deactivate(&id)?;
            println!("Product {id} deactivated");
        }
        Commands::Sale { json } => {
            let input: NewSale = serde_json::from_str(&json)?;
            print_json(&shop.record_sale(input)?)?;
        }
        Commands::SaleCancel { id } => {
            print_json(&shop.cancel_sale(&id)?)?;
        }
        Commands::SaleComplete { id } => {
            print_json(&shop.complete_sale(&id)?)?;
        }
        Commands::Sales {
            limit,
            since,
            until,
            status,
        } => {
            let status = status
                .map(|s| s.parse::<SaleStatus>())
                .transpose()
                .map_err(|e: String| e)?;
            let filter = SaleFilter {
                since: parse_date(&since)?,
                until: parse_date(&until)?,
                status,
                limit: Some(limit),
            };
            print_json(&shop.list_sales(&filter)?)?;
        }
        Commands::Summary { days } => {
            print_json(&shop.summary(days)?)?;
        }
        Commands::Prices => {
            print_json(&shop.suggest_prices()?)?;
        }
        Commands::Price { id } => {
            print_json(&shop.review_price(&id)?)?;
        }
        Commands::Project { days } => {
            print_json(&shop.project_revenue(days)?)?;
        }
        Commands::Insights => {
            print_json(&shop.insights()?)?;
        }
        Commands::Config => {
            print_json(shop.config())?;
        }
    }
    Ok(())
}

fn parse_date(s: &Option<String>) -> Result<Option<chrono::DateTime<chrono::Utc>>, String> {
    match s {
        None => Ok(None),
        Some(s) => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                return Ok(Some(dt.with_timezone(&chrono::Utc)));
            }
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Ok(Some(date.and_time(chrono::NaiveTime::MIN).and_utc()));
            }
            Err(format!("Invalid date format: {s}. Use YYYY-MM-DD or RFC3339"))
        }
    }
}
