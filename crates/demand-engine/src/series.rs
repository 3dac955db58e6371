//! Time-series roll-up for the detail view
//!
//! Averages the monthly facts of every product under a hierarchy path into
//! one point per period, keeping only the most recent `window` periods.

use std::collections::BTreeMap;

use demand_types::{ForecastLag, Period, SeriesPoint};

use crate::hierarchy::HierarchyIndex;

#[derive(Debug, Default)]
struct PeriodSums {
    rows: usize,
    sales_qty: f64,
    sales_volume: f64,
    /// Sum per lag, `None` until some row supplies that lag
    lags: [Option<f64>; 4],
}

impl PeriodSums {
    fn mean(&self, sum: f64) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            (sum / self.rows as f64).round()
        }
    }
}

/// Per-period averages for all products under `hierarchy_path`.
///
/// Each value is the sum over contributing fact rows divided by the number
/// of rows for that period, rounded. Points are in period order; only the
/// last `window` periods are returned.
pub fn aggregate_series(
    index: &HierarchyIndex,
    hierarchy_path: &str,
    window: usize,
) -> Vec<SeriesPoint> {
    let mut by_period: BTreeMap<Period, PeriodSums> = BTreeMap::new();

    for product in index.products_under(hierarchy_path) {
        for fact in index.facts_for(&product.id) {
            let sums = by_period.entry(fact.period.clone()).or_default();
            sums.rows += 1;
            sums.sales_qty += fact.sales_qty;
            sums.sales_volume += fact.sales_volume;
            for (slot, lag) in sums.lags.iter_mut().zip(ForecastLag::ALL) {
                if let Some(value) = lag.get(&fact.forecasts) {
                    *slot = Some(slot.unwrap_or(0.0) + value);
                }
            }
        }
    }

    let skip = by_period.len().saturating_sub(window);
    by_period
        .into_iter()
        .skip(skip)
        .map(|(period, sums)| {
            let [lag1, lag5, lag10, lag15] = sums.lags.map(|lag| lag.map(|v| sums.mean(v)));
            SeriesPoint {
                period,
                sales_qty: sums.mean(sums.sales_qty),
                sales_volume: sums.mean(sums.sales_volume),
                lag1,
                lag5,
                lag10,
                lag15,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use demand_types::{ForecastLags, Product, TimeSeriesFact};
    use pretty_assertions::assert_eq;

    fn product(id: &str, l2: &str) -> Product {
        let date = NaiveDate::from_ymd_opt(2023, 2, 3).unwrap();
        Product {
            id: id.into(),
            level1: "Footwear".into(),
            level2: l2.into(),
            level3: "Shorts".into(),
            level4: format!("SKU-{id}"),
            launch_date: date,
            eol_date: date,
        }
    }

    fn fact(id: &str, period: &str, qty: f64, lag1: Option<f64>) -> TimeSeriesFact {
        TimeSeriesFact {
            product_id: id.into(),
            period: period.parse().unwrap(),
            sales_qty: qty,
            sales_volume: qty * 10.0,
            forecasts: ForecastLags {
                lag1,
                ..ForecastLags::default()
            },
        }
    }

    #[test]
    fn test_means_per_period() {
        let index = HierarchyIndex::new(
            vec![product("a", "Kids"), product("b", "Kids"), product("c", "Men's Running")],
            vec![
                fact("a", "2024-01", 10.0, Some(12.0)),
                fact("b", "2024-01", 21.0, None),
                fact("c", "2024-01", 999.0, Some(1.0)),
                fact("a", "2024-02", 4.0, None),
            ],
        );

        let points = aggregate_series(&index, "Footwear/Kids", 24);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period.as_str(), "2024-01");
        // (10 + 21) / 2 = 15.5 -> 16
        assert_eq!(points[0].sales_qty, 16.0);
        assert_eq!(points[0].sales_volume, 155.0);
        // lag sum divided by all rows of the period
        assert_eq!(points[0].lag1, Some(6.0));
        assert_eq!(points[0].lag5, None);
        assert_eq!(points[1].lag1, None);
    }

    #[test]
    fn test_window_keeps_latest() {
        let facts = (1..=12)
            .map(|m| fact("a", &format!("2024-{:02}", m), m as f64, None))
            .collect();
        let index = HierarchyIndex::new(vec![product("a", "Kids")], facts);
        let points = aggregate_series(&index, "Footwear", 3);
        let periods: Vec<&str> = points.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2024-10", "2024-11", "2024-12"]);
    }

    #[test]
    fn test_unknown_path_is_empty() {
        let index = HierarchyIndex::new(vec![product("a", "Kids")], vec![]);
        assert!(aggregate_series(&index, "Apparel", 24).is_empty());
    }
}
