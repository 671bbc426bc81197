use crate::domain::entities::sale::{Sale, SaleLine};
use crate::domain::error::DomainError;
use crate::domain::ports::sales_history::*;
use crate::domain::values::payment_method::PaymentMethod;
use crate::domain::values::sale_status::SaleStatus;
use crate::infrastructure::sqlite::{from_db_decimal, from_db_time, to_db_time};
use rusqlite::{params, Connection};
use std::sync::Mutex;

const SELECT_COLS: &str = "id, sale_number, sold_at, status, customer, subtotal, discount, total, payment_method, notes, created_at";
const LINE_COLS: &str = "product_id, product_name, quantity, unit_price, line_total";

pub struct SqliteSaleRepo {
    conn: Mutex<Connection>,
}

impl SqliteSaleRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Header columns only; lines are attached by [`Self::load_lines`].
    fn row_to_sale(row: &rusqlite::Row) -> Result<Sale, rusqlite::Error> {
        let sold_str: String = row.get(2)?;
        let status_str: String = row.get(3)?;
        let subtotal_str: String = row.get(5)?;
        let discount_str: String = row.get(6)?;
        let total_str: String = row.get(7)?;
        let method_str: String = row.get(8)?;
        let created_str: String = row.get(10)?;

        Ok(Sale {
            id: row.get(0)?,
            sale_number: row.get(1)?,
            sold_at: from_db_time("sold_at", &sold_str),
            status: status_str.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    status = %status_str,
                    "invalid status in sale, defaulting to pending"
                );
                SaleStatus::Pending
            }),
            customer: row.get(4)?,
            lines: Vec::new(),
            subtotal: from_db_decimal("subtotal", &subtotal_str),
            discount: from_db_decimal("discount", &discount_str),
            total: from_db_decimal("total", &total_str),
            payment_method: method_str.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    payment_method = %method_str,
                    "invalid payment method in sale, defaulting to other"
                );
                PaymentMethod::Other
            }),
            notes: row.get(9)?,
            created_at: from_db_time("created_at", &created_str),
        })
    }

    fn row_to_line(row: &rusqlite::Row) -> Result<SaleLine, rusqlite::Error> {
        let unit_price_str: String = row.get(3)?;
        let line_total_str: String = row.get(4)?;
        Ok(SaleLine {
            product_id: row.get(0)?,
            product_name: row.get(1)?,
            quantity: row.get(2)?,
            unit_price: from_db_decimal("unit_price", &unit_price_str),
            line_total: from_db_decimal("line_total", &line_total_str),
        })
    }

    fn load_lines(conn: &Connection, sales: &mut [Sale]) -> Result<(), DomainError> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM sale_lines WHERE sale_id = ?1 ORDER BY position ASC",
                LINE_COLS
            ))
            .map_err(|e| DomainError::Database(e.to_string()))?;
        for sale in sales.iter_mut() {
            sale.lines = stmt
                .query_map(params![sale.id], Self::row_to_line)
                .map_err(|e| DomainError::Database(e.to_string()))?
                .filter_map(|r| r.ok())
                .collect();
        }
        Ok(())
    }
}

impl SalesHistory for SqliteSaleRepo {
    fn add_sale(&self, sale: &Sale) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        tx.execute(
            "INSERT INTO sales (id, sale_number, sold_at, status, customer, subtotal, discount, total, payment_method, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                sale.id,
                sale.sale_number,
                to_db_time(&sale.sold_at),
                sale.status.to_string(),
                sale.customer,
                sale.subtotal.to_string(),
                sale.discount.to_string(),
                sale.total.to_string(),
                sale.payment_method.to_string(),
                sale.notes,
                to_db_time(&sale.created_at),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add sale: {e}")))?;
        for (position, line) in sale.lines.iter().enumerate() {
            tx.execute(
                "INSERT INTO sale_lines (sale_id, position, product_id, product_name, quantity, unit_price, line_total)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    sale.id,
                    position as i64,
                    line.product_id,
                    line.product_name,
                    line.quantity,
                    line.unit_price.to_string(),
                    line.line_total.to_string(),
                ],
            )
            .map_err(|e| DomainError::Database(format!("Failed to add sale line: {e}")))?;
        }
        tx.commit()
            .map_err(|e| DomainError::Database(format!("Failed to commit sale: {e}")))?;
        Ok(())
    }

    fn get_sale(&self, id: &str) -> Result<Option<Sale>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM sales WHERE id = ?1", SELECT_COLS))
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut sales: Vec<Sale> = stmt
            .query_map(params![id], Self::row_to_sale)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .take(1)
            .collect();
        Self::load_lines(&conn, &mut sales)?;
        Ok(sales.pop())
    }

    fn set_status(&self, id: &str, status: SaleStatus) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let rows = conn
            .execute(
                "UPDATE sales SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id],
            )
            .map_err(|e| DomainError::Database(format!("Failed to update sale: {e}")))?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!("Sale not found: {id}")));
        }
        Ok(())
    }

    fn list_sales(&self, filter: &SaleFilter) -> Result<Vec<Sale>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut sql = format!("SELECT {} FROM sales WHERE 1=1", SELECT_COLS);
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(since) = &filter.since {
            sql.push_str(&format!(" AND sold_at >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(to_db_time(since)));
        }
        if let Some(until) = &filter.until {
            sql.push_str(&format!(" AND sold_at <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(to_db_time(until)));
        }
        if let Some(status) = &filter.status {
            sql.push_str(&format!(" AND status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status.to_string()));
        }
        sql.push_str(" ORDER BY sold_at DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT ?{}", param_values.len() + 1));
            param_values.push(Box::new(limit as i64));
        }

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut sales: Vec<Sale> = stmt
            .query_map(params_refs.as_slice(), Self::row_to_sale)
            .map_err(|e| DomainError::Database(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        drop(stmt);
        Self::load_lines(&conn, &mut sales)?;
        Ok(sales)
    }
}
