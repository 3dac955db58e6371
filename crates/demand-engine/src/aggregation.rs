//! ABC-XYZ aggregation
//!
//! Rolls trailing-window facts up to one hierarchy level and classifies
//! each group:
//!
//! ```text
//! products ──group by path prefix──► groups (BTreeMap, path order)
//!                                        │
//!            trailing N facts per member │
//!                                        ▼
//!        volume / quantity sums, pooled qty samples, lag errors
//!                                        │
//!          ┌─────────────────────────────┴──────────────┐
//!          ▼                                            ▼
//!   ABC: stable sort by volume desc,            XYZ: CV% banded
//!        cumulative share <= a / <= b                <= x / <= y
//! ```
//!
//! Pure and infallible: empty input yields an empty output, zero totals
//! degrade to class C / CV 0.

use std::collections::BTreeMap;

use demand_types::{
    element_id_for, keys, AbcClass, ComputedAggregate, HierarchyLevel, Product,
    TimeSeriesFact, VolumeType, XyzClass,
};
use tracing::debug;

use crate::config::ClassificationConfig;
use crate::hierarchy::HierarchyIndex;

// =============================================================================
// ENGINE
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    config: ClassificationConfig,
}

/// Running sums for one hierarchy group
#[derive(Debug, Default)]
struct GroupAccumulator {
    volume: f64,
    quantity: f64,
    qty_samples: Vec<f64>,
    lag1: ErrorMean,
    lag5: ErrorMean,
}

/// Mean absolute percentage error over qualifying periods
#[derive(Debug, Default)]
struct ErrorMean {
    sum: f64,
    count: usize,
}

impl ErrorMean {
    fn observe(&mut self, actual: f64, forecast: Option<f64>) {
        // Periods without a forecast or with no actual demand are skipped
        let Some(forecast) = forecast else { return };
        if actual <= 0.0 {
            return;
        }
        self.sum += (actual - forecast).abs() / actual * 100.0;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

impl AggregationEngine {
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    /// Aggregate every product of `index` at `level`.
    ///
    /// Output is sorted ascending by hierarchy path and partitions the
    /// product set.
    pub fn compute(
        &self,
        index: &HierarchyIndex,
        volume_type: VolumeType,
        level: HierarchyLevel,
    ) -> Vec<ComputedAggregate> {
        let mut groups: BTreeMap<String, GroupAccumulator> = BTreeMap::new();

        for product in index.products() {
            let group = groups.entry(product.path_at(level)).or_default();
            for fact in index.trailing_facts(&product.id, self.config.trailing_window) {
                group.volume += fact.sales_volume;
                group.quantity += fact.sales_qty;
                group.qty_samples.push(fact.sales_qty);
                group.lag1.observe(fact.sales_qty, fact.forecasts.lag1);
                group.lag5.observe(fact.sales_qty, fact.forecasts.lag5);
            }
        }

        let abc_volumes: Vec<f64> = groups
            .values()
            .map(|g| match volume_type {
                VolumeType::Quantity => g.quantity,
                VolumeType::Monetary => g.volume,
            })
            .collect();
        let abc = abc_classes(&abc_volumes, &self.config);

        let aggregates: Vec<ComputedAggregate> = groups
            .into_iter()
            .zip(abc_volumes)
            .zip(abc)
            .map(|(((path, group), volume_total), abc_class)| {
                let variance_percent = coefficient_of_variation(&group.qty_samples);
                let mut aggregates = BTreeMap::new();
                aggregates.insert(keys::TOTAL_VOLUME.to_string(), group.volume);
                aggregates.insert(keys::TOTAL_QUANTITY.to_string(), group.quantity);
                aggregates.insert(keys::AVG_LAG1_ERROR.to_string(), group.lag1.mean());
                aggregates.insert(keys::AVG_LAG5_ERROR.to_string(), group.lag5.mean());

                ComputedAggregate {
                    element_id: element_id_for(&path),
                    hierarchy_path: path,
                    volume_total,
                    variance_percent,
                    abc_class,
                    xyz_class: xyz_class(variance_percent, &self.config),
                    aggregates,
                }
            })
            .collect();

        debug!(
            level = level.depth(),
            volume_type = volume_type.as_str(),
            groups = aggregates.len(),
            "Computed aggregates"
        );

        aggregates
    }
}

/// Aggregate raw product and fact slices with default settings
pub fn compute_aggregates(
    products: &[Product],
    facts: &[TimeSeriesFact],
    volume_type: VolumeType,
    level: HierarchyLevel,
) -> Vec<ComputedAggregate> {
    let index = HierarchyIndex::new(products.to_vec(), facts.to_vec());
    AggregationEngine::default().compute(&index, volume_type, level)
}

// =============================================================================
// CLASSIFIERS
// =============================================================================

/// Population standard deviation over mean, in percent (0 when mean is 0)
pub fn coefficient_of_variation(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean * 100.0
}

/// XYZ band for a CV percentage; boundaries belong to the lower band
pub fn xyz_class(variance_percent: f64, config: &ClassificationConfig) -> XyzClass {
    if variance_percent <= config.xyz_x_max {
        XyzClass::X
    } else if variance_percent <= config.xyz_y_max {
        XyzClass::Y
    } else {
        XyzClass::Z
    }
}

/// ABC class per volume, returned in input order.
///
/// Volumes are ranked descending with a stable sort, so equal volumes keep
/// their input order. A group is A while the cumulative share including it
/// is <= `abc_a_share`, B while <= `abc_b_share`, otherwise C.
pub fn abc_classes(volumes: &[f64], config: &ClassificationConfig) -> Vec<AbcClass> {
    let total: f64 = volumes.iter().sum();
    if total <= 0.0 {
        return vec![AbcClass::C; volumes.len()];
    }

    let mut order: Vec<usize> = (0..volumes.len()).collect();
    order.sort_by(|a, b| volumes[*b].total_cmp(&volumes[*a]));

    let mut classes = vec![AbcClass::C; volumes.len()];
    let mut cumulative = 0.0;
    for idx in order {
        cumulative += volumes[idx];
        let share = cumulative / total;
        classes[idx] = if share <= config.abc_a_share {
            AbcClass::A
        } else if share <= config.abc_b_share {
            AbcClass::B
        } else {
            AbcClass::C
        };
    }
    classes
}
