use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            price TEXT NOT NULL,
            units_on_hand INTEGER NOT NULL DEFAULT 0 CHECK (units_on_hand >= 0),
            reorder_threshold INTEGER NOT NULL DEFAULT 0 CHECK (reorder_threshold >= 0),
            unit TEXT NOT NULL DEFAULT 'unit',
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sales (
            id TEXT PRIMARY KEY,
            sale_number TEXT NOT NULL UNIQUE,
            sold_at TEXT NOT NULL,
            status TEXT NOT NULL,
            customer TEXT,
            subtotal TEXT NOT NULL,
            discount TEXT NOT NULL,
            total TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sale_lines (
            sale_id TEXT NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            product_id TEXT NOT NULL,
            product_name TEXT NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity >= 1),
            unit_price TEXT NOT NULL,
            line_total TEXT NOT NULL,
            PRIMARY KEY (sale_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_products_active ON products(active);
        CREATE INDEX IF NOT EXISTS idx_sales_sold_at ON sales(sold_at);
        CREATE INDEX IF NOT EXISTS idx_sales_status ON sales(status);
        CREATE INDEX IF NOT EXISTS idx_sale_lines_product ON sale_lines(product_id);
        ",
    )
    .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
