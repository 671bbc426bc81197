use crate::application::summary::{product_totals, ProductSales};
use crate::domain::entities::product::Product;
use crate::domain::entities::sale::Sale;
use crate::domain::error::DomainError;
use crate::domain::ports::product_catalog::{ProductCatalog, ProductFilter};
use crate::domain::ports::sales_history::{SaleFilter, SalesHistory};
use crate::domain::values::confidence::ConfidenceLevel;
use crate::domain::values::heuristics::HeuristicsConfig;
use crate::domain::values::money::{round_count, round_money};
use crate::domain::values::window::TrailingWindows;
use chrono::{DateTime, Datelike, Utc, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

pub struct InsightsUseCase {
    catalog: Arc<dyn ProductCatalog>,
    sales: Arc<dyn SalesHistory>,
    config: Arc<HeuristicsConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Alert,
    Suggestion,
    Forecast,
    Opportunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub action: Option<String>,
    pub expected_impact: Option<String>,
    pub data: Option<serde_json::Value>,
}

/// Indexed by `Weekday::num_days_from_sunday`.
const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_sunday() as usize]
}

fn in_first_window<'a>(
    sales: &'a [Sale],
    windows: TrailingWindows,
) -> impl Iterator<Item = &'a Sale> {
    sales
        .iter()
        .filter(move |s| s.is_completed() && windows.index_of(s.sold_at) == Some(0))
}

/// What today is likely to bring, from the same weekday over the medium-term window.
pub fn forecast_today(sales: &[Sale], now: DateTime<Utc>, config: &HeuristicsConfig) -> Insight {
    let window_days = config.windows.medium_term_days;
    let today = now.weekday();
    let same_day: Vec<&Sale> = in_first_window(sales, TrailingWindows::new(now, window_days))
        .filter(|s| s.sold_at.weekday() == today)
        .collect();

    if same_day.is_empty() {
        return Insight {
            kind: InsightKind::Forecast,
            priority: Priority::Low,
            title: "Today's forecast".to_string(),
            message: "Collecting data to produce more accurate forecasts.".to_string(),
            action: None,
            expected_impact: None,
            data: None,
        };
    }

    let weeks = (window_days / 7).max(1);
    let count = same_day.len();
    let revenue: Decimal = same_day.iter().map(|s| s.total).sum();
    let average_ticket = round_money(revenue / Decimal::from(count as u64));
    let transactions = round_count(Decimal::from(count as u64) / Decimal::from(weeks));
    let confidence = if count >= weeks as usize {
        ConfidenceLevel::High
    } else {
        ConfidenceLevel::Medium
    };

    Insight {
        kind: InsightKind::Forecast,
        priority: Priority::Medium,
        title: "Today's forecast".to_string(),
        message: format!(
            "Based on the last {window_days} days, today you could sell about {average_ticket} per ticket across roughly {transactions} transactions."
        ),
        action: None,
        expected_impact: None,
        data: Some(serde_json::json!({
            "weekday": weekday_name(today),
            "average_ticket": average_ticket,
            "estimated_transactions": transactions,
            "confidence": confidence,
        })),
    }
}

/// High-priority alerts for active products whose stock covers only a few days of sales.
pub fn stock_out_alerts(
    sales: &[Sale],
    products: &[Product],
    now: DateTime<Utc>,
    config: &HeuristicsConfig,
) -> Vec<Insight> {
    let window_days = Decimal::from(config.windows.short_term_days);
    let cover_days = config.alerts.stock_out_days;
    let recent = in_first_window(sales, TrailingWindows::new(now, config.windows.short_term_days));
    let by_id: HashMap<&str, &Product> = products
        .iter()
        .filter(|p| p.active)
        .map(|p| (p.id.as_str(), p))
        .collect();

    let mut at_risk: Vec<(Decimal, Insight)> = Vec::new();
    for totals in product_totals(recent) {
        let Some(product) = by_id.get(totals.product_id.as_str()) else {
            continue;
        };
        let daily_rate = Decimal::from(totals.units) / window_days;
        if daily_rate <= Decimal::ZERO {
            continue;
        }
        let days_left = Decimal::from(product.units_on_hand) / daily_rate;
        if days_left <= Decimal::ZERO || days_left >= cover_days {
            continue;
        }

        let days_shown = days_left.ceil().to_u64().unwrap_or(0);
        let lost_sales = round_count(daily_rate * cover_days);
        at_risk.push((
            days_left,
            Insight {
                kind: InsightKind::Alert,
                priority: Priority::High,
                title: format!("Critical stock: {}", product.name),
                message: format!(
                    "At the current pace \"{}\" runs out in about {} day(s). Only {} {} left.",
                    product.name, days_shown, product.units_on_hand, product.unit
                ),
                action: Some(format!("Restock {} urgently", product.name)),
                expected_impact: Some(format!("Avoids losing about {lost_sales} sales")),
                data: Some(serde_json::json!({
                    "product_id": product.id,
                    "units_on_hand": product.units_on_hand,
                    "daily_rate": round_money(daily_rate),
                    "days_left": round_money(days_left),
                })),
            },
        ));
    }

    at_risk.sort_by(|a, b| a.0.cmp(&b.0));
    at_risk.into_iter().map(|(_, insight)| insight).collect()
}

/// Busiest vs slowest weekday by transaction count.
pub fn weekday_pattern(
    sales: &[Sale],
    now: DateTime<Utc>,
    config: &HeuristicsConfig,
) -> Option<Insight> {
    let mut counts = [0usize; 7];
    let mut revenue = [Decimal::ZERO; 7];
    for sale in in_first_window(sales, TrailingWindows::new(now, config.windows.medium_term_days)) {
        let idx = sale.sold_at.weekday().num_days_from_sunday() as usize;
        counts[idx] += 1;
        revenue[idx] += sale.total;
    }

    let mut best: Option<usize> = None;
    let mut worst: Option<usize> = None;
    for idx in 0..7 {
        if counts[idx] == 0 {
            continue;
        }
        if best.map_or(true, |b| counts[idx] > counts[b]) {
            best = Some(idx);
        }
        if worst.map_or(true, |w| counts[idx] < counts[w]) {
            worst = Some(idx);
        }
    }
    let (best, worst) = (best?, worst?);

    let best_count = Decimal::from(counts[best] as u64);
    let worst_count = Decimal::from(counts[worst] as u64);
    let margin = Decimal::ONE + config.alerts.pattern_min_variance_percent / Decimal::from(100);
    if best_count <= worst_count * margin {
        return None;
    }

    let difference = round_count((best_count - worst_count) / worst_count * Decimal::from(100));
    let (best_day, worst_day) = (WEEKDAY_NAMES[best], WEEKDAY_NAMES[worst]);
    let recoverable = round_money(revenue[best] * config.alerts.pattern_recoverable_share);

    Some(Insight {
        kind: InsightKind::Suggestion,
        priority: Priority::Medium,
        title: "Weekday sales pattern detected".to_string(),
        message: format!(
            "You sell {difference}% more on {best_day} than on {worst_day}. Consider preparing extra stock the day before {best_day}."
        ),
        action: Some("Plan inventory preparation around the weekly pattern".to_string()),
        expected_impact: Some(format!(
            "Up to {recoverable} in recovered monthly revenue from fewer lost sales"
        )),
        data: None,
    })
}

/// Top sellers by revenue over the medium-term window.
pub fn star_products(
    sales: &[Sale],
    now: DateTime<Utc>,
    config: &HeuristicsConfig,
) -> Option<Insight> {
    let windows = TrailingWindows::new(now, config.windows.medium_term_days);
    let mut top: Vec<ProductSales> = product_totals(in_first_window(sales, windows));
    top.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    top.truncate(config.alerts.star_products.max(1));

    let leader = top.first()?;
    Some(Insight {
        kind: InsightKind::Opportunity,
        priority: Priority::High,
        title: "Star product detected".to_string(),
        message: format!(
            "\"{}\" is your top earner: {} over the last {} days ({} units sold).",
            leader.product_name,
            round_money(leader.revenue),
            config.windows.medium_term_days,
            leader.units
        ),
        action: Some("Consider promotions or bundles built around this product".to_string()),
        expected_impact: Some("Sales could grow up to 25% with the right strategy".to_string()),
        data: serde_json::to_value(&top).ok(),
    })
}

impl InsightsUseCase {
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

    pub fn generate(&self) -> Result<Vec<Insight>, DomainError> {
        self.generate_at(Utc::now())
    }

    /// Forecast first, then stock alerts, the weekday pattern and star products.
    pub fn generate_at(&self, now: DateTime<Utc>) -> Result<Vec<Insight>, DomainError> {
        let w = &self.config.windows;
        let span = w.medium_term_days.max(w.short_term_days);
        let since = TrailingWindows::new(now, span).start_of(1);
        let sales = self.sales.list_sales(&SaleFilter::completed_since(since))?;
        let products = self.catalog.list_products(&ProductFilter::active())?;

        let mut insights = vec![forecast_today(&sales, now, &self.config)];
        insights.extend(stock_out_alerts(&sales, &products, now, &self.config));
        insights.extend(weekday_pattern(&sales, now, &self.config));
        insights.extend(star_products(&sales, now, &self.config));

        tracing::info!(
            sales = sales.len(),
            products = products.len(),
            insights = insights.len(),
            "store insights generated"
        );
        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::demand::fixtures::*;
    use chrono::Duration;

    #[test]
    fn test_forecast_without_history() {
        let now = Utc::now();
        let insight = forecast_today(&[], now, &HeuristicsConfig::default());
        assert_eq!(insight.kind, InsightKind::Forecast);
        assert_eq!(insight.priority, Priority::Low);
        assert!(insight.data.is_none());
    }

    #[test]
    fn test_forecast_uses_same_weekday() {
        let now = Utc::now();
        let p = product("Bagel", Decimal::from(4));
        let mut sales: Vec<Sale> = (1..=4)
            .map(|w| sale_at(&p, 5, now - Duration::weeks(w)))
            .collect();
        // Other weekdays must not count.
        sales.push(sale_at(&p, 100, now - Duration::days(1)));

        let insight = forecast_today(&sales, now, &HeuristicsConfig::default());
        assert_eq!(insight.priority, Priority::Medium);
        let data = insight.data.unwrap();
        assert_eq!(data["estimated_transactions"], 1);
        assert_eq!(data["confidence"], "high");
        assert!(insight.message.contains("20"));
    }

    #[test]
    fn test_stock_out_alert_for_fast_mover() {
        let now = Utc::now();
        let mut p = product("Yogurt", Decimal::from(2));
        p.units_on_hand = 10;
        // 35 units over 7 days = 5/day -> 2 days left.
        let sales = vec![sale_days_ago(&p, 35, 2, now)];

        let alerts = stock_out_alerts(&sales, &[p.clone()], now, &HeuristicsConfig::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, InsightKind::Alert);
        assert_eq!(alerts[0].priority, Priority::High);
        assert!(alerts[0].message.contains("2 day(s)"));
        assert_eq!(alerts[0].expected_impact.as_deref(), Some("Avoids losing about 15 sales"));
    }

    #[test]
    fn test_no_stock_out_alert_when_covered_or_empty() {
        let now = Utc::now();
        let config = HeuristicsConfig::default();
        let mut covered = product("Salt", Decimal::from(1));
        covered.units_on_hand = 100;
        let mut empty = product("Pepper", Decimal::from(1));
        empty.units_on_hand = 0;
        let mut inactive = product("Sugar", Decimal::from(1));
        inactive.units_on_hand = 1;
        inactive.active = false;

        let sales = vec![
            sale_days_ago(&covered, 14, 1, now),
            sale_days_ago(&empty, 14, 1, now),
            sale_days_ago(&inactive, 14, 1, now),
        ];
        let alerts = stock_out_alerts(&sales, &[covered, empty, inactive], now, &config);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_weekday_pattern() {
        let now = Utc::now();
        let p = product("Pizza", Decimal::from(10));
        let monday = now - Duration::days(now.weekday().num_days_from_monday() as i64 + 7);
        let tuesday = monday + Duration::days(1);
        let mut sales: Vec<Sale> = (0..4).map(|_| sale_at(&p, 1, monday)).collect();
        sales.extend((0..2).map(|_| sale_at(&p, 1, tuesday)));

        let insight = weekday_pattern(&sales, now, &HeuristicsConfig::default()).unwrap();
        assert_eq!(insight.kind, InsightKind::Suggestion);
        assert!(insight.message.contains("100% more on Monday than on Tuesday"));
        // 15 % of 40.00 on Mondays
        assert!(insight.expected_impact.unwrap().contains("6.00"));
    }

    #[test]
    fn test_weekday_pattern_needs_variance() {
        let now = Utc::now();
        let p = product("Soda", Decimal::from(1));
        let monday = now - Duration::days(now.weekday().num_days_from_monday() as i64 + 7);
        let mut sales: Vec<Sale> = (0..4).map(|_| sale_at(&p, 1, monday)).collect();
        sales.extend((0..4).map(|_| sale_at(&p, 1, monday + Duration::days(1))));

        assert!(weekday_pattern(&sales, now, &HeuristicsConfig::default()).is_none());
        assert!(weekday_pattern(&[], now, &HeuristicsConfig::default()).is_none());
    }

    #[test]
    fn test_star_products_ranked_by_revenue() {
        let now = Utc::now();
        let cheap = product("Napkins", Decimal::new(10, 2));
        let pricey = product("Wine", Decimal::from(30));
        let mid = product("Cheese", Decimal::from(8));
        let other = product("Crackers", Decimal::from(2));
        let sales = vec![
            sale_days_ago(&cheap, 200, 1, now),
            sale_days_ago(&pricey, 3, 2, now),
            sale_days_ago(&mid, 5, 3, now),
            sale_days_ago(&other, 1, 4, now),
        ];

        let insight = star_products(&sales, now, &HeuristicsConfig::default()).unwrap();
        assert_eq!(insight.kind, InsightKind::Opportunity);
        assert!(insight.message.contains("Wine"));
        let data = insight.data.unwrap();
        let names: Vec<&str> = data
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["product_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Wine", "Cheese", "Napkins"]);
    }

    #[test]
    fn test_no_star_without_sales() {
        assert!(star_products(&[], Utc::now(), &HeuristicsConfig::default()).is_none());
    }
}
