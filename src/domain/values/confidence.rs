use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::values::heuristics::ConfidenceThresholds;

/// Qualitative indicator of how much history backs an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Grade an estimate by the number of distinct days of data behind it.
    pub fn from_data_days(days: usize, thresholds: &ConfidenceThresholds) -> Self {
        if days >= thresholds.high_confidence_days {
            ConfidenceLevel::High
        } else if days < thresholds.min_data_points {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Medium
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "low"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::High => write!(f, "high"),
        }
    }
}
