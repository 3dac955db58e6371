//! Product taxonomy and fact table index
//!
//! Holds the immutable product list and the append-only fact table, with
//! facts grouped per product and ordered by period so trailing windows are
//! a slice away.

use std::collections::{BTreeSet, HashMap};

use demand_types::{
    ComputedAggregate, HierarchyLevel, Period, Product, TimeSeriesFact, VolumeType,
};
use tracing::debug;

use crate::aggregation::AggregationEngine;

#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    products: Vec<Product>,
    facts: Vec<TimeSeriesFact>,
    /// product id -> indices into `facts`, sorted by period
    by_product: HashMap<String, Vec<usize>>,
}

impl HierarchyIndex {
    pub fn new(products: Vec<Product>, facts: Vec<TimeSeriesFact>) -> Self {
        let mut by_product: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, fact) in facts.iter().enumerate() {
            by_product
                .entry(fact.product_id.clone())
                .or_default()
                .push(idx);
        }
        for indices in by_product.values_mut() {
            indices.sort_by(|a, b| facts[*a].period.cmp(&facts[*b].period));
        }

        debug!(
            products = products.len(),
            facts = facts.len(),
            "Built hierarchy index"
        );

        Self {
            products,
            facts,
            by_product,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn facts(&self) -> &[TimeSeriesFact] {
        &self.facts
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All facts of one product in period order
    pub fn facts_for<'a>(&'a self, product_id: &str) -> impl Iterator<Item = &'a TimeSeriesFact> {
        self.by_product
            .get(product_id)
            .into_iter()
            .flatten()
            .map(move |idx| &self.facts[*idx])
    }

    /// The last `n` facts of one product (fewer if fewer exist)
    pub fn trailing_facts(&self, product_id: &str, n: usize) -> Vec<&TimeSeriesFact> {
        let Some(indices) = self.by_product.get(product_id) else {
            return Vec::new();
        };
        let start = indices.len().saturating_sub(n);
        indices[start..].iter().map(|idx| &self.facts[*idx]).collect()
    }

    /// Products whose taxonomy starts with `path` (whole segments)
    pub fn products_under<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products.iter().filter(move |p| p.is_under(path))
    }

    /// Distinct periods across the fact table, ascending
    pub fn periods(&self) -> Vec<Period> {
        self.facts
            .iter()
            .map(|f| f.period.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Aggregate with default classification settings
    pub fn compute_aggregates(
        &self,
        volume_type: VolumeType,
        level: HierarchyLevel,
    ) -> Vec<ComputedAggregate> {
        AggregationEngine::default().compute(self, volume_type, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use demand_types::ForecastLags;
    use pretty_assertions::assert_eq;

    fn product(id: &str, l1: &str, l4: &str) -> Product {
        let date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        Product {
            id: id.into(),
            level1: l1.into(),
            level2: "Kids".into(),
            level3: "Shorts".into(),
            level4: l4.into(),
            launch_date: date,
            eol_date: date,
        }
    }

    fn fact(id: &str, period: &str, qty: f64) -> TimeSeriesFact {
        TimeSeriesFact {
            product_id: id.into(),
            period: period.parse().unwrap(),
            sales_qty: qty,
            sales_volume: qty * 2.0,
            forecasts: ForecastLags::default(),
        }
    }

    fn index() -> HierarchyIndex {
        HierarchyIndex::new(
            vec![product("p1", "Apparel", "S1"), product("p2", "Footwear", "S2")],
            vec![
                fact("p1", "2024-03", 3.0),
                fact("p1", "2024-01", 1.0),
                fact("p2", "2024-01", 5.0),
                fact("p1", "2024-02", 2.0),
            ],
        )
    }

    #[test]
    fn test_facts_sorted_by_period() {
        let idx = index();
        let qty: Vec<f64> = idx.facts_for("p1").map(|f| f.sales_qty).collect();
        assert_eq!(qty, vec![1.0, 2.0, 3.0]);
        assert_eq!(idx.facts_for("missing").count(), 0);
    }

    #[test]
    fn test_trailing_facts() {
        let idx = index();
        let qty: Vec<f64> = idx
            .trailing_facts("p1", 2)
            .iter()
            .map(|f| f.sales_qty)
            .collect();
        assert_eq!(qty, vec![2.0, 3.0]);
        assert_eq!(idx.trailing_facts("p1", 12).len(), 3);
        assert!(idx.trailing_facts("missing", 12).is_empty());
    }

    #[test]
    fn test_products_under_and_periods() {
        let idx = index();
        let ids: Vec<&str> = idx
            .products_under("Apparel/Kids")
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1"]);
        let periods: Vec<String> = idx.periods().iter().map(|p| p.to_string()).collect();
        assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);
    }
}
