//! Tunable business constants for the pricing, projection and alerting
//! heuristics.
//!
//! Every threshold the heuristics compare against lives here instead of being
//! baked into the algorithms. [`HeuristicsConfig::default`] carries the values
//! the store runs with out of the box; a JSON file may override any subset of
//! them (missing keys keep their defaults).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Longest window or horizon a configuration may ask for.
pub const MAX_WINDOW_DAYS: u32 = 3650;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub windows: WindowConfig,
    pub demand: DemandThresholds,
    pub pricing: PriceAdjustments,
    pub optimization: OptimizationFactors,
    pub projection: ProjectionLimits,
    pub confidence: ConfidenceThresholds,
    pub alerts: AlertThresholds,
}

/// Lengths (in days) of the trailing windows the heuristics look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Sales velocity window for stock-out detection.
    pub short_term_days: u32,
    /// Window compared against its predecessor when deriving a trend.
    pub medium_term_days: u32,
    /// History the revenue projection averages over.
    pub long_term_days: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            short_term_days: 7,
            medium_term_days: 30,
            long_term_days: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandThresholds {
    /// Units sold in the recent window above which demand is high.
    pub high_units: u64,
    /// Units sold in the recent window above which demand is medium.
    pub medium_units: u64,
    /// Percent change above which a trend is growing.
    pub growing_percent: Decimal,
    /// Percent change below which a trend is declining.
    pub declining_percent: Decimal,
}

impl Default for DemandThresholds {
    fn default() -> Self {
        Self {
            high_units: 50,
            medium_units: 20,
            growing_percent: Decimal::from(15),
            declining_percent: Decimal::from(-15),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceAdjustments {
    pub high_demand_growing: Decimal,
    pub low_demand_declining: Decimal,
    pub high_demand_declining: Decimal,
    pub medium_demand_growing: Decimal,
    /// Smallest absolute price change worth suggesting.
    pub min_change: Decimal,
}

impl Default for PriceAdjustments {
    fn default() -> Self {
        Self {
            high_demand_growing: Decimal::new(115, 2),
            low_demand_declining: Decimal::new(85, 2),
            high_demand_declining: Decimal::new(95, 2),
            medium_demand_growing: Decimal::new(108, 2),
            min_change: Decimal::new(50, 2),
        }
    }
}

/// Additive uplifts layered onto the optimized revenue scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationFactors {
    pub inventory: Decimal,
    pub promotions: Decimal,
    pub pricing: Decimal,
    pub loyalty: Decimal,
    /// Loyalty uplift applies only above this many projected transactions.
    pub loyalty_min_transactions: u64,
}

impl Default for OptimizationFactors {
    fn default() -> Self {
        Self {
            inventory: Decimal::new(5, 2),
            promotions: Decimal::new(8, 2),
            pricing: Decimal::new(12, 2),
            loyalty: Decimal::new(10, 2),
            loyalty_min_transactions: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionLimits {
    pub min_days: u32,
    pub max_days: u32,
    /// Revenue trend (percent) below which a declining-sales risk is raised.
    pub declining_risk_percent: Decimal,
}

impl Default for ProjectionLimits {
    fn default() -> Self {
        Self {
            min_days: 1,
            max_days: 365,
            declining_risk_percent: Decimal::from(-5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Fewer days of data than this means low confidence.
    pub min_data_points: usize,
    /// At least this many days of data means high confidence.
    pub high_confidence_days: usize,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            min_data_points: 30,
            high_confidence_days: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Alert when stock on hand covers fewer than this many days of sales.
    pub stock_out_days: Decimal,
    /// Busiest weekday must beat the slowest by this percent to be reported.
    pub pattern_min_variance_percent: Decimal,
    /// Share of the busiest weekday's revenue quoted as recoverable.
    pub pattern_recoverable_share: Decimal,
    /// How many top sellers the star-product insight lists.
    pub star_products: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            stock_out_days: Decimal::from(3),
            pattern_min_variance_percent: Decimal::from(30),
            pattern_recoverable_share: Decimal::new(15, 2),
            star_products: 3,
        }
    }
}

impl HeuristicsConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        let w = &self.windows;
        if w.short_term_days == 0 || w.medium_term_days == 0 || w.long_term_days == 0 {
            return Err(DomainError::Config("window lengths must be at least one day".into()));
        }
        for (name, days) in [
            ("short_term_days", w.short_term_days),
            ("medium_term_days", w.medium_term_days),
            ("long_term_days", w.long_term_days),
        ] {
            if days > MAX_WINDOW_DAYS {
                return Err(DomainError::Config(format!(
                    "{name} ({days}) exceeds the {MAX_WINDOW_DAYS}-day limit"
                )));
            }
        }
        let two_medium = w.medium_term_days.checked_mul(2).unwrap_or(u32::MAX);
        if w.long_term_days < two_medium {
            return Err(DomainError::Config(format!(
                "long_term_days ({}) must cover two medium-term windows ({} days each)",
                w.long_term_days, w.medium_term_days
            )));
        }
        if self.demand.high_units <= self.demand.medium_units {
            return Err(DomainError::Config(format!(
                "high_units ({}) must exceed medium_units ({})",
                self.demand.high_units, self.demand.medium_units
            )));
        }
        if self.demand.growing_percent <= self.demand.declining_percent {
            return Err(DomainError::Config(
                "growing_percent must exceed declining_percent".into(),
            ));
        }
        let p = &self.pricing;
        for (name, factor) in [
            ("high_demand_growing", p.high_demand_growing),
            ("low_demand_declining", p.low_demand_declining),
            ("high_demand_declining", p.high_demand_declining),
            ("medium_demand_growing", p.medium_demand_growing),
        ] {
            if factor <= Decimal::ZERO {
                return Err(DomainError::Config(format!(
                    "price multiplier {name} must be positive, got {factor}"
                )));
            }
        }
        if p.min_change < Decimal::ZERO {
            return Err(DomainError::Config("min_change must not be negative".into()));
        }
        let o = &self.optimization;
        if [o.inventory, o.promotions, o.pricing, o.loyalty]
            .iter()
            .any(|f| *f < Decimal::ZERO)
        {
            return Err(DomainError::Config(
                "optimization factors must not be negative".into(),
            ));
        }
        if self.projection.max_days > MAX_WINDOW_DAYS {
            return Err(DomainError::Config(format!(
                "projection max_days ({}) exceeds the {MAX_WINDOW_DAYS}-day limit",
                self.projection.max_days
            )));
        }
        if self.projection.min_days == 0 || self.projection.min_days > self.projection.max_days {
            return Err(DomainError::Config(format!(
                "projection range {}..={} is empty",
                self.projection.min_days, self.projection.max_days
            )));
        }
        if self.confidence.min_data_points > self.confidence.high_confidence_days {
            return Err(DomainError::Config(
                "min_data_points must not exceed high_confidence_days".into(),
            ));
        }
        Ok(())
    }
}
