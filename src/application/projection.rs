//! Revenue projection over a future horizon.
//!
//! The current scenario extrapolates the flat daily average of the long-term
//! window. The optimized scenario layers additive uplifts on top of it, so its
//! multiplier never drops below 1.0.

use crate::domain::entities::sale::Sale;
use crate::domain::error::DomainError;
use crate::domain::ports::product_catalog::ProductCatalog;
use crate::domain::ports::sales_history::{SaleFilter, SalesHistory};
use crate::domain::values::confidence::ConfidenceLevel;
use crate::domain::values::heuristics::HeuristicsConfig;
use crate::domain::values::horizon::Horizon;
use crate::domain::values::money::{percent_change, round_count, round_money};
use crate::domain::values::window::TrailingWindows;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

pub const INSUFFICIENT_DATA: &str = "insufficient data";
pub const DECLINING_TREND: &str = "declining sales trend detected";
pub const NO_SIGNIFICANT_RISKS: &str = "no significant risks detected";

#[derive(Debug, Clone, Serialize)]
pub struct RevenueProjection {
    pub horizon_days: u32,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub daily_average_revenue: Decimal,
    pub current: CurrentScenario,
    pub optimized: OptimizedScenario,
    pub confidence: ConfidenceLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentScenario {
    pub estimated_revenue: Decimal,
    pub estimated_transactions: u64,
    pub growth_percent: Decimal,
    pub risks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizedScenario {
    pub estimated_revenue: Decimal,
    pub estimated_transactions: u64,
    pub growth_percent: Decimal,
    pub extra_revenue: Decimal,
    pub adjustments: Vec<Adjustment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentCategory {
    Inventory,
    Promotions,
    Pricing,
    Loyalty,
}

#[derive(Debug, Clone, Serialize)]
pub struct Adjustment {
    pub category: AdjustmentCategory,
    pub description: String,
    pub expected_impact: String,
    /// Additive contribution to the optimization multiplier.
    pub factor: Decimal,
}

fn percent_label(factor: Decimal) -> String {
    format!("+{}%", (factor * Decimal::from(100)).normalize())
}

fn degenerate(horizon: Horizon, now: DateTime<Utc>) -> RevenueProjection {
    RevenueProjection {
        horizon_days: horizon.days(),
        period_start: now,
        period_end: now + Duration::days(horizon.days() as i64),
        daily_average_revenue: Decimal::ZERO,
        current: CurrentScenario {
            estimated_revenue: Decimal::ZERO,
            estimated_transactions: 0,
            growth_percent: Decimal::ZERO,
            risks: vec![INSUFFICIENT_DATA.to_string()],
        },
        optimized: OptimizedScenario {
            estimated_revenue: Decimal::ZERO,
            estimated_transactions: 0,
            growth_percent: Decimal::ZERO,
            extra_revenue: Decimal::ZERO,
            adjustments: Vec::new(),
        },
        confidence: ConfidenceLevel::Low,
    }
}

fn build_adjustments(
    below_reorder: usize,
    current_transactions: u64,
    config: &HeuristicsConfig,
) -> Vec<Adjustment> {
    let f = &config.optimization;
    let mut adjustments = Vec::new();

    if below_reorder > 0 {
        adjustments.push(Adjustment {
            category: AdjustmentCategory::Inventory,
            description: format!(
                "Restock {below_reorder} product(s) at or below their reorder threshold"
            ),
            expected_impact: format!("{} sales by avoiding stock-outs", percent_label(f.inventory)),
            factor: f.inventory,
        });
    }
    adjustments.push(Adjustment {
        category: AdjustmentCategory::Promotions,
        description: "Run targeted promotions on low-demand days".to_string(),
        expected_impact: format!("{} sales on slow days", percent_label(f.promotions)),
        factor: f.promotions,
    });
    adjustments.push(Adjustment {
        category: AdjustmentCategory::Pricing,
        description: "Apply the price suggestions to key products".to_string(),
        expected_impact: format!("{} margin without losing volume", percent_label(f.pricing)),
        factor: f.pricing,
    });
    if current_transactions > f.loyalty_min_transactions {
        adjustments.push(Adjustment {
            category: AdjustmentCategory::Loyalty,
            description: "Launch a loyalty program for frequent customers".to_string(),
            expected_impact: format!("{} purchase frequency", percent_label(f.loyalty)),
            factor: f.loyalty,
        });
    }
    adjustments
}

/// Project revenue for `horizon` days from completed sales in the long-term window.
///
/// `below_reorder` is the number of active products at or below their
/// reorder threshold. With no eligible history the projection is all zeros
/// with low confidence.
pub fn project_revenue(
    horizon: Horizon,
    sales: &[Sale],
    below_reorder: usize,
    now: DateTime<Utc>,
    config: &HeuristicsConfig,
) -> RevenueProjection {
    let lookback = TrailingWindows::new(now, config.windows.long_term_days);
    let history: Vec<&Sale> = sales
        .iter()
        .filter(|s| s.is_completed() && lookback.index_of(s.sold_at) == Some(0))
        .collect();

    if history.is_empty() {
        return degenerate(horizon, now);
    }

    let lookback_days = Decimal::from(config.windows.long_term_days);
    let days = Decimal::from(horizon.days());
    let revenue: Decimal = history.iter().map(|s| s.total).sum();
    let count = Decimal::from(history.len() as u64);

    // Trend: the two most recent medium-term windows. Equal lengths, so the
    // ratio of their totals equals the ratio of their daily averages.
    let trend_windows = TrailingWindows::new(now, config.windows.medium_term_days);
    let (mut recent, mut prior) = (Decimal::ZERO, Decimal::ZERO);
    for sale in &history {
        match trend_windows.index_of(sale.sold_at) {
            Some(0) => recent += sale.total,
            Some(1) => prior += sale.total,
            _ => {}
        }
    }
    let trend = percent_change(recent, prior).unwrap_or(Decimal::ZERO);

    let current_revenue = round_money(revenue * days / lookback_days);
    let current_transactions = round_count(count * days / lookback_days);
    let current_growth = round_money(trend);

    let mut risks = Vec::new();
    if below_reorder > 0 {
        risks.push(format!(
            "{below_reorder} product(s) below reorder threshold may cause lost sales"
        ));
    }
    if trend < config.projection.declining_risk_percent {
        risks.push(DECLINING_TREND.to_string());
    }
    if risks.is_empty() {
        risks.push(NO_SIGNIFICANT_RISKS.to_string());
    }

    let adjustments = build_adjustments(below_reorder, current_transactions, config);
    let multiplier = Decimal::ONE + adjustments.iter().map(|a| a.factor).sum::<Decimal>();

    let optimized_revenue = round_money(revenue * days * multiplier / lookback_days);
    let optimized_growth =
        round_money((multiplier - Decimal::ONE) * Decimal::from(100) + current_growth);
    let optimized_transactions = round_count(Decimal::from(current_transactions) * multiplier);

    let data_days = history
        .iter()
        .map(|s| s.sold_at.date_naive())
        .collect::<HashSet<_>>()
        .len();

    RevenueProjection {
        horizon_days: horizon.days(),
        period_start: now,
        period_end: now + Duration::days(horizon.days() as i64),
        daily_average_revenue: round_money(revenue / lookback_days),
        current: CurrentScenario {
            estimated_revenue: current_revenue,
            estimated_transactions: current_transactions,
            growth_percent: current_growth,
            risks,
        },
        optimized: OptimizedScenario {
            estimated_revenue: optimized_revenue,
            estimated_transactions: optimized_transactions,
            growth_percent: optimized_growth,
            extra_revenue: round_money(optimized_revenue - current_revenue),
            adjustments,
        },
        confidence: ConfidenceLevel::from_data_days(data_days, &config.confidence),
    }
}

pub struct ProjectionUseCase {
    catalog: Arc<dyn ProductCatalog>,
    sales: Arc<dyn SalesHistory>,
    config: Arc<HeuristicsConfig>,
}

impl ProjectionUseCase {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        sales: Arc<dyn SalesHistory>,
        config: Arc<HeuristicsConfig>,
    ) -> Self {
        Self {
            catalog,
            sales,
            config,
        }
    }

    pub fn execute(&self, days: i64) -> Result<RevenueProjection, DomainError> {
        self.execute_at(days, Utc::now())
    }

    pub fn execute_at(
        &self,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<RevenueProjection, DomainError> {
        let horizon = Horizon::new(days, &self.config.projection)?;
        let since = TrailingWindows::new(now, self.config.windows.long_term_days).start_of(1);
        let history = self.sales.list_sales(&SaleFilter::completed_since(since))?;
        let below_reorder = self.catalog.count_below_reorder()?;

        let projection = project_revenue(horizon, &history, below_reorder, now, &self.config);
        tracing::info!(
            horizon = %horizon,
            sales = history.len(),
            below_reorder,
            confidence = %projection.confidence,
            "revenue projection generated"
        );
        Ok(projection)
    }
}
