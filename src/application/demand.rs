//! Demand classification for a single product.
//!
//! Units sold in the most recent window are bucketed into a [`DemandLevel`];
//! comparing them with the window immediately before yields a [`Trend`]. The
//! two windows never overlap (see [`TrailingWindows`]).

use crate::domain::entities::sale::Sale;
use crate::domain::values::demand::{DemandAssessment, DemandLevel, Trend};
use crate::domain::values::heuristics::HeuristicsConfig;
use crate::domain::values::money::{percent_change, round_money};
use crate::domain::values::window::TrailingWindows;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Classify demand for `product_id` from the supplied sales history.
///
/// Sales that are not completed, that fall outside the two windows, or that
/// do not reference the product contribute nothing. With no usable data the
/// result is low demand with a stable trend.
pub fn classify_demand(
    product_id: &str,
    sales: &[Sale],
    now: DateTime<Utc>,
    config: &HeuristicsConfig,
) -> DemandAssessment {
    let windows = TrailingWindows::new(now, config.windows.medium_term_days);
    let mut recent_units = 0u64;
    let mut prior_units = 0u64;

    for sale in sales.iter().filter(|s| s.is_completed()) {
        match windows.index_of(sale.sold_at) {
            Some(0) => recent_units += sale.units_of(product_id),
            Some(1) => prior_units += sale.units_of(product_id),
            _ => {}
        }
    }

    let change = percent_change(Decimal::from(recent_units), Decimal::from(prior_units));

    DemandAssessment {
        level: DemandLevel::from_units(recent_units, &config.demand),
        trend: Trend::from_change(change, &config.demand),
        recent_units,
        prior_units,
        change_percent: change.map(round_money),
    }
}

/// Earliest sale timestamp [`classify_demand`] can look at.
pub fn history_start(now: DateTime<Utc>, config: &HeuristicsConfig) -> DateTime<Utc> {
    TrailingWindows::new(now, config.windows.medium_term_days).start_of(2)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::entities::product::Product;
    use crate::domain::entities::sale::{Sale, SaleLine};
    use crate::domain::values::payment_method::PaymentMethod;
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal::Decimal;

    pub fn product(name: &str, price: Decimal) -> Product {
        Product::new(
            name.to_lowercase().replace(' ', "-"),
            name.to_string(),
            "general".into(),
            price,
            100,
            5,
            "unit".into(),
        )
    }

    pub fn sale_at(product: &Product, quantity: u32, sold_at: DateTime<Utc>) -> Sale {
        Sale::new(
            vec![SaleLine::new(product, quantity)],
            Decimal::ZERO,
            PaymentMethod::Cash,
            None,
            None,
            sold_at,
        )
    }

    pub fn sale_days_ago(product: &Product, quantity: u32, days: i64, now: DateTime<Utc>) -> Sale {
        sale_at(product, quantity, now - Duration::days(days) - Duration::hours(1))
    }

    /// One sale of `recent` units inside the recent window and one of `prior`
    /// units inside the window before it (zero-unit sides are omitted).
    pub fn two_window_history(
        product: &Product,
        recent: u32,
        prior: u32,
        now: DateTime<Utc>,
    ) -> Vec<Sale> {
        let mut sales = Vec::new();
        if recent > 0 {
            sales.push(sale_days_ago(product, recent, 3, now));
        }
        if prior > 0 {
            sales.push(sale_days_ago(product, prior, 40, now));
        }
        sales
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::values::sale_status::SaleStatus;
    use chrono::Duration;

    #[test]
    fn test_high_growing() {
        let now = Utc::now();
        let p = product("Coffee", Decimal::from(10));
        let sales = two_window_history(&p, 60, 40, now);

        let a = classify_demand(&p.id, &sales, now, &HeuristicsConfig::default());
        assert_eq!(a.level, DemandLevel::High);
        assert_eq!(a.trend, Trend::Growing);
        assert_eq!(a.recent_units, 60);
        assert_eq!(a.prior_units, 40);
        assert_eq!(a.change_percent, Some(Decimal::from(50)));
    }

    #[test]
    fn test_low_declining() {
        let now = Utc::now();
        let p = product("Tea", Decimal::from(5));
        let sales = two_window_history(&p, 15, 30, now);

        let a = classify_demand(&p.id, &sales, now, &HeuristicsConfig::default());
        assert_eq!(a.level, DemandLevel::Low);
        assert_eq!(a.trend, Trend::Declining);
    }

    #[test]
    fn test_medium_stable() {
        let now = Utc::now();
        let p = product("Milk", Decimal::from(2));
        let sales = two_window_history(&p, 25, 25, now);

        let a = classify_demand(&p.id, &sales, now, &HeuristicsConfig::default());
        assert_eq!(a.level, DemandLevel::Medium);
        assert_eq!(a.trend, Trend::Stable);
    }

    #[test]
    fn test_no_prior_baseline_is_stable() {
        let now = Utc::now();
        let p = product("Bread", Decimal::from(3));
        let sales = two_window_history(&p, 80, 0, now);

        let a = classify_demand(&p.id, &sales, now, &HeuristicsConfig::default());
        assert_eq!(a.level, DemandLevel::High);
        assert_eq!(a.trend, Trend::Stable);
        assert_eq!(a.change_percent, None);
    }

    #[test]
    fn test_empty_history() {
        let now = Utc::now();
        let a = classify_demand("missing", &[], now, &HeuristicsConfig::default());
        assert_eq!(a.level, DemandLevel::Low);
        assert_eq!(a.trend, Trend::Stable);
        assert_eq!(a.recent_units, 0);
    }

    #[test]
    fn test_ignores_other_products_and_statuses() {
        let now = Utc::now();
        let p = product("Eggs", Decimal::from(4));
        let other = product("Flour", Decimal::from(4));

        let mut pending = sale_days_ago(&p, 100, 1, now);
        pending.status = SaleStatus::Pending;
        let mut cancelled = sale_days_ago(&p, 100, 1, now);
        cancelled.status = SaleStatus::Cancelled;
        let sales = vec![pending, cancelled, sale_days_ago(&other, 70, 1, now)];

        let a = classify_demand(&p.id, &sales, now, &HeuristicsConfig::default());
        assert_eq!(a.recent_units, 0);
        assert_eq!(a.level, DemandLevel::Low);
    }

    #[test]
    fn test_windows_do_not_double_count() {
        let now = Utc::now();
        let p = product("Rice", Decimal::from(1));
        // Each window is closed at its older end.
        let recent_edge = sale_at(&p, 10, now - Duration::days(30));
        let prior_edge = sale_at(&p, 7, now - Duration::days(60));
        // Older than both windows: ignored.
        let stale = sale_at(&p, 500, now - Duration::days(60) - Duration::milliseconds(1));
        // Future-dated: ignored.
        let future = sale_at(&p, 500, now + Duration::days(1));

        let sales = [recent_edge, prior_edge, stale, future];
        let a = classify_demand(&p.id, &sales, now, &HeuristicsConfig::default());
        assert_eq!(a.recent_units, 10);
        assert_eq!(a.prior_units, 7);
        assert_eq!(a.trend, Trend::Growing);
    }

    #[test]
    fn test_just_past_recent_window_is_prior() {
        let now = Utc::now();
        let p = product("Beans", Decimal::from(1));
        let sales = [sale_at(&p, 10, now - Duration::days(30) - Duration::milliseconds(1))];

        let a = classify_demand(&p.id, &sales, now, &HeuristicsConfig::default());
        assert_eq!(a.recent_units, 0);
        assert_eq!(a.prior_units, 10);
        assert_eq!(a.trend, Trend::Declining);
    }

    #[test]
    fn test_trend_matches_ratio_thresholds() {
        let now = Utc::now();
        let config = HeuristicsConfig::default();
        let p = product("Soap", Decimal::from(1));

        for prior in [1u32, 7, 20, 40, 100] {
            for recent in 0u32..=2 * prior + 5 {
                let sales = two_window_history(&p, recent, prior, now);
                let a = classify_demand(&p.id, &sales, now, &config);
                let (r, q) = (recent as u64 * 100, prior as u64);
                let expected = if r > q * 115 {
                    Trend::Growing
                } else if r < q * 85 {
                    Trend::Declining
                } else {
                    Trend::Stable
                };
                assert_eq!(a.trend, expected, "recent={recent} prior={prior}");
            }
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let now = Utc::now();
        let mut config = HeuristicsConfig::default();
        config.demand.high_units = 100;
        config.demand.medium_units = 60;
        let p = product("Oil", Decimal::from(9));
        let sales = two_window_history(&p, 60, 0, now);

        let a = classify_demand(&p.id, &sales, now, &config);
        assert_eq!(a.level, DemandLevel::Low);
    }

    #[test]
    fn test_history_start_spans_two_windows() {
        let now = Utc::now();
        assert_eq!(
            history_start(now, &HeuristicsConfig::default()),
            now - Duration::days(60)
        );
    }
}
