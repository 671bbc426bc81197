use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Completed => write!(f, "completed"),
            SaleStatus::Pending => write!(f, "pending"),
            SaleStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for SaleStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(SaleStatus::Completed),
            "pending" => Ok(SaleStatus::Pending),
            "cancelled" | "canceled" => Ok(SaleStatus::Cancelled),
            _ => Err(format!("Unknown sale status: {s}")),
        }
    }
}
