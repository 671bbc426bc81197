use crate::application::demand::{classify_demand, history_start};
use crate::domain::entities::product::Product;
use crate::domain::error::DomainError;
use crate::domain::ports::product_catalog::{ProductCatalog, ProductFilter};
use crate::domain::ports::sales_history::{SaleFilter, SalesHistory};
use crate::domain::values::confidence::ConfidenceLevel;
use crate::domain::values::demand::{DemandAssessment, DemandLevel, Trend};
use crate::domain::values::heuristics::{HeuristicsConfig, PriceAdjustments};
use crate::domain::values::money::round_money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// A recommended price change for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSuggestion {
    pub product_id: String,
    pub product_name: String,
    pub current_price: Decimal,
    pub suggested_price: Decimal,
    pub rationale: String,
    pub expected_impact: String,
    pub confidence: ConfidenceLevel,
    pub demand: DemandLevel,
    pub trend: Trend,
}

/// Pricing analysis of a single product, with or without a recommended change.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReview {
    pub product_id: String,
    pub product_name: String,
    pub current_price: Decimal,
    pub assessment: DemandAssessment,
    pub suggestion: Option<PriceSuggestion>,
}

struct PriceRule {
    multiplier: Decimal,
    confidence: ConfidenceLevel,
    rationale: &'static str,
    expected_impact: &'static str,
}

/// Rule table. First match wins; combinations without a rule leave the price alone.
fn rule_for(assessment: &DemandAssessment, factors: &PriceAdjustments) -> Option<PriceRule> {
    match (assessment.level, assessment.trend) {
        (DemandLevel::High, Trend::Growing) => Some(PriceRule {
            multiplier: factors.high_demand_growing,
            confidence: ConfidenceLevel::High,
            rationale: "High and growing demand. Customers are willing to pay more for this popular product.",
            expected_impact: "Higher margin without hurting sales volume",
        }),
        (DemandLevel::Low, Trend::Declining) => Some(PriceRule {
            multiplier: factors.low_demand_declining,
            confidence: ConfidenceLevel::Medium,
            rationale: "Low and declining demand. A more attractive price could revive sales.",
            expected_impact: "Potential 30-40% increase in units sold",
        }),
        (DemandLevel::High, Trend::Declining) => Some(PriceRule {
            multiplier: factors.high_demand_declining,
            confidence: ConfidenceLevel::Medium,
            rationale: "Demand is high but falling. A moderate cut can hold volume.",
            expected_impact: "Keeps current sales volume and competitiveness",
        }),
        (DemandLevel::Medium, Trend::Growing) => Some(PriceRule {
            multiplier: factors.medium_demand_growing,
            confidence: ConfidenceLevel::High,
            rationale: "Demand is growing steadily. A good moment to improve margins.",
            expected_impact: "More revenue with minimal impact on sales",
        }),
        _ => None,
    }
}

/// Suggest a new price for `product` given its demand assessment.
///
/// Returns `None` when no rule applies or when the rounded change is smaller
/// than the configured minimum.
pub fn suggest_price(
    product: &Product,
    assessment: &DemandAssessment,
    config: &HeuristicsConfig,
) -> Option<PriceSuggestion> {
    let rule = rule_for(assessment, &config.pricing)?;
    let suggested = round_money(product.price * rule.multiplier).max(Decimal::ZERO);

    if (suggested - product.price).abs() < config.pricing.min_change {
        return None;
    }

    Some(PriceSuggestion {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        current_price: product.price,
        suggested_price: suggested,
        rationale: rule.rationale.to_string(),
        expected_impact: rule.expected_impact.to_string(),
        confidence: rule.confidence,
        demand: assessment.level,
        trend: assessment.trend,
    })
}

pub struct PricingUseCase {
    catalog: Arc<dyn ProductCatalog>,
    sales: Arc<dyn SalesHistory>,
    config: Arc<HeuristicsConfig>,
}

impl PricingUseCase {
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

    /// Suggestions for every active product whose price should move.
    pub fn suggest_all(&self) -> Result<Vec<PriceSuggestion>, DomainError> {
        self.suggest_all_at(Utc::now())
    }

    pub fn suggest_all_at(&self, now: DateTime<Utc>) -> Result<Vec<PriceSuggestion>, DomainError> {
        let products = self.catalog.list_products(&ProductFilter::active())?;
        let history = self
            .sales
            .list_sales(&SaleFilter::completed_since(history_start(now, &self.config)))?;

        let suggestions: Vec<PriceSuggestion> = products
            .iter()
            .filter_map(|p| {
                let assessment = classify_demand(&p.id, &history, now, &self.config);
                suggest_price(p, &assessment, &self.config)
            })
            .collect();

        tracing::info!(
            products = products.len(),
            sales = history.len(),
            suggestions = suggestions.len(),
            "price suggestions computed"
        );
        Ok(suggestions)
    }

    /// Pricing review for one product. Unknown or inactive products are `NotFound`.
    pub fn review(&self, product_id: &str) -> Result<PriceReview, DomainError> {
        self.review_at(product_id, Utc::now())
    }

    pub fn review_at(
        &self,
        product_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PriceReview, DomainError> {
        let product = self
            .catalog
            .get_product(product_id)?
            .filter(|p| p.active)
            .ok_or_else(|| {
                DomainError::NotFound(format!("Product not found or inactive: {product_id}"))
            })?;
        let history = self
            .sales
            .list_sales(&SaleFilter::completed_since(history_start(now, &self.config)))?;

        let assessment = classify_demand(&product.id, &history, now, &self.config);
        let suggestion = suggest_price(&product, &assessment, &self.config);
        tracing::debug!(
            product_id,
            demand = %assessment.level,
            trend = %assessment.trend,
            suggested = suggestion.is_some(),
            "price review"
        );

        Ok(PriceReview {
            product_id: product.id,
            product_name: product.name,
            current_price: product.price,
            assessment,
            suggestion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::demand::fixtures::*;

    fn assess(level: DemandLevel, trend: Trend) -> DemandAssessment {
        DemandAssessment {
            level,
            trend,
            recent_units: 0,
            prior_units: 0,
            change_percent: None,
        }
    }

    #[test]
    fn test_high_growing_raises_price() {
        let now = Utc::now();
        let config = HeuristicsConfig::default();
        let p = product("Coffee", Decimal::new(1000, 2));
        let sales = two_window_history(&p, 60, 40, now);
        let a = classify_demand(&p.id, &sales, now, &config);

        let s = suggest_price(&p, &a, &config).expect("suggestion expected");
        assert_eq!(s.suggested_price, Decimal::new(1150, 2));
        assert_eq!(s.confidence, ConfidenceLevel::High);
        assert_eq!(s.demand, DemandLevel::High);
        assert_eq!(s.trend, Trend::Growing);
    }

    #[test]
    fn test_low_declining_cuts_price() {
        let now = Utc::now();
        let config = HeuristicsConfig::default();
        let p = product("Tea", Decimal::new(500, 2));
        let sales = two_window_history(&p, 15, 30, now);
        let a = classify_demand(&p.id, &sales, now, &config);

        let s = suggest_price(&p, &a, &config).expect("suggestion expected");
        assert_eq!(s.suggested_price, Decimal::new(425, 2));
        assert_eq!(s.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_medium_stable_is_no_op() {
        let now = Utc::now();
        let config = HeuristicsConfig::default();
        let p = product("Milk", Decimal::new(1000, 2));
        let sales = two_window_history(&p, 25, 25, now);
        let a = classify_demand(&p.id, &sales, now, &config);

        assert!(suggest_price(&p, &a, &config).is_none());
    }

    #[test]
    fn test_remaining_rules() {
        let config = HeuristicsConfig::default();
        let p = product("Cheese", Decimal::from(20));

        let s = suggest_price(&p, &assess(DemandLevel::High, Trend::Declining), &config).unwrap();
        assert_eq!(s.suggested_price, Decimal::new(1900, 2));
        assert_eq!(s.confidence, ConfidenceLevel::Medium);

        let s = suggest_price(&p, &assess(DemandLevel::Medium, Trend::Growing), &config).unwrap();
        assert_eq!(s.suggested_price, Decimal::new(2160, 2));
        assert_eq!(s.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_unlisted_combinations_never_suggest() {
        let config = HeuristicsConfig::default();
        let unlisted = [
            (DemandLevel::High, Trend::Stable),
            (DemandLevel::Medium, Trend::Stable),
            (DemandLevel::Medium, Trend::Declining),
            (DemandLevel::Low, Trend::Growing),
            (DemandLevel::Low, Trend::Stable),
        ];
        for price in [Decimal::ONE, Decimal::from(100), Decimal::from(100_000)] {
            let p = product("Anything", price);
            for (level, trend) in unlisted {
                assert!(suggest_price(&p, &assess(level, trend), &config).is_none());
            }
        }
    }

    #[test]
    fn test_small_delta_suppressed() {
        let config = HeuristicsConfig::default();
        // 3.00 × 1.15 = 3.45: a 0.45 change is below the 0.50 minimum.
        let p = product("Gum", Decimal::from(3));
        assert!(suggest_price(&p, &assess(DemandLevel::High, Trend::Growing), &config).is_none());

        // 4.00 × 0.85 = 3.40: exactly 0.60, emitted.
        let p = product("Candy", Decimal::from(4));
        assert!(suggest_price(&p, &assess(DemandLevel::Low, Trend::Declining), &config).is_some());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = HeuristicsConfig::default();
        // 10.00 × 0.95 = 9.50: a change of exactly 0.50.
        let p = product("Juice", Decimal::from(10));
        let s = suggest_price(&p, &assess(DemandLevel::High, Trend::Declining), &config);
        assert_eq!(s.unwrap().suggested_price, Decimal::new(950, 2));
    }

    #[test]
    fn test_zero_price_never_negative() {
        let config = HeuristicsConfig::default();
        let p = product("Freebie", Decimal::ZERO);
        assert!(suggest_price(&p, &assess(DemandLevel::Low, Trend::Declining), &config).is_none());
    }

    #[test]
    fn test_idempotent() {
        let now = Utc::now();
        let config = HeuristicsConfig::default();
        let p = product("Coffee", Decimal::new(1000, 2));
        let sales = two_window_history(&p, 60, 40, now);

        let first = suggest_price(&p, &classify_demand(&p.id, &sales, now, &config), &config);
        let second = suggest_price(&p, &classify_demand(&p.id, &sales, now, &config), &config);
        assert_eq!(first, second);
    }
}
