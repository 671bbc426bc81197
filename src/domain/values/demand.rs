use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::values::heuristics::DemandThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

impl DemandLevel {
    pub fn from_units(units: u64, thresholds: &DemandThresholds) -> Self {
        if units > thresholds.high_units {
            DemandLevel::High
        } else if units > thresholds.medium_units {
            DemandLevel::Medium
        } else {
            DemandLevel::Low
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandLevel::Low => write!(f, "low"),
            DemandLevel::Medium => write!(f, "medium"),
            DemandLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Growing,
    Stable,
    Declining,
}

impl Trend {
    /// Classify a percent change. No baseline (`None`) reads as stable.
    pub fn from_change(change_percent: Option<Decimal>, thresholds: &DemandThresholds) -> Self {
        match change_percent {
            Some(pct) if pct > thresholds.growing_percent => Trend::Growing,
            Some(pct) if pct < thresholds.declining_percent => Trend::Declining,
            _ => Trend::Stable,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Growing => write!(f, "growing"),
            Trend::Stable => write!(f, "stable"),
            Trend::Declining => write!(f, "declining"),
        }
    }
}

/// Demand bucket and trend for one product, derived from two disjoint windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandAssessment {
    pub level: DemandLevel,
    pub trend: Trend,
    /// Units sold in the most recent window.
    pub recent_units: u64,
    /// Units sold in the window immediately before it.
    pub prior_units: u64,
    pub change_percent: Option<Decimal>,
}
