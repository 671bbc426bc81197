use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use crate::domain::ports::product_catalog::*;
use crate::infrastructure::sqlite::{from_db_decimal, from_db_time, to_db_time};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::sync::Mutex;

const SELECT_COLS: &str = "id, code, name, category, price, units_on_hand, reorder_threshold, unit, active, created_at, updated_at";

pub struct SqliteProductRepo {
    conn: Mutex<Connection>,
}

impl SqliteProductRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn row_to_product(row: &rusqlite::Row) -> Result<Product, rusqlite::Error> {
        let price_str: String = row.get(4)?;
        let active_int: i32 = row.get(8)?;
        let created_str: String = row.get(9)?;
        let updated_str: String = row.get(10)?;

        Ok(Product {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            category: row.get(3)?,
            price: from_db_decimal("price", &price_str),
            units_on_hand: row.get(5)?,
            reorder_threshold: row.get(6)?,
            unit: row.get(7)?,
            active: active_int != 0,
            created_at: from_db_time("created_at", &created_str),
            updated_at: from_db_time("updated_at", &updated_str),
        })
    }

    fn update_one(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::types::ToSql],
        id: &str,
    ) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let rows = conn
            .execute(sql, params)
            .map_err(|e| DomainError::Database(format!("Failed to update product: {e}")))?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!("Product not found: {id}")));
        }
        Ok(())
    }
}

impl ProductCatalog for SqliteProductRepo {
    fn add_product(&self, product: &Product) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO products (id, code, name, category, price, units_on_hand, reorder_threshold, unit, active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                product.id,
                product.code,
                product.name,
                product.category,
                product.price.to_string(),
                product.units_on_hand,
                product.reorder_threshold,
                product.unit,
                product.active as i32,
                to_db_time(&product.created_at),
                to_db_time(&product.updated_at),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DomainError::InvalidInput(format!("Product code already exists: {}", product.code))
            }
            other => DomainError::Database(format!("Failed to add product: {other}")),
        })?;
        Ok(())
    }

    fn get_product(&self, id: &str) -> Result<Option<Product>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM products WHERE id = ?1", SELECT_COLS))
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut rows = stmt
            .query_map(params![id], Self::row_to_product)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(rows.next().and_then(|r| r.ok()))
    }

    fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut sql = format!("SELECT {} FROM products WHERE 1=1", SELECT_COLS);
        if filter.active_only {
            sql.push_str(" AND active = 1");
        }
        if filter.below_reorder_only {
            sql.push_str(" AND units_on_hand <= reorder_threshold");
        }
        sql.push_str(" ORDER BY name ASC");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let products = stmt
            .query_map([], Self::row_to_product)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(products)
    }

    fn count_below_reorder(&self) -> Result<usize, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM products WHERE active = 1 AND units_on_hand <= reorder_threshold",
                [],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(count as usize)
    }

    fn set_stock(&self, id: &str, units_on_hand: u32) -> Result<(), DomainError> {
        let now = to_db_time(&chrono::Utc::now());
        self.update_one(
            "UPDATE products SET units_on_hand = ?1, updated_at = ?2 WHERE id = ?3",
            params![units_on_hand, now, id],
            id,
        )
    }

    fn set_price(&self, id: &str, price: Decimal) -> Result<(), DomainError> {
        let now = to_db_time(&chrono::Utc::now());
        self.update_one(
            "UPDATE products SET price = ?1, updated_at = ?2 WHERE id = ?3",
            params![price.to_string(), now, id],
            id,
        )
    }

    fn set_active(&self, id: &str, active: bool) -> Result<(), DomainError> {
        let now = to_db_time(&chrono::Utc::now());
        self.update_one(
            "UPDATE products SET active = ?1, updated_at = ?2 WHERE id = ?3",
            params![active as i32, now, id],
            id,
        )
    }
}
