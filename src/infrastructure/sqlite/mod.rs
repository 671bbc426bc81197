pub mod migrations;
pub mod product_repo;
pub mod sale_repo;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Fixed-width UTC timestamps so that lexical order matches time order.
pub(crate) fn to_db_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn from_db_time(column: &str, raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!(column, value = raw, error = %e, "invalid timestamp in row, using now");
            Utc::now()
        })
}

pub(crate) fn from_db_decimal(column: &str, raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(column, value = raw, error = %e, "invalid decimal in row, using zero");
        Decimal::ZERO
    })
}
