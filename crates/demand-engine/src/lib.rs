//! Demand Engine
//!
//! Rolls monthly product facts up the 4-level taxonomy and classifies each
//! group ABC (Pareto on volume) and XYZ (coefficient-of-variation bands).
//!
//! # Architecture
//!
//! ```text
//! Vec<Product> + Vec<TimeSeriesFact>
//!        │
//!        ▼
//! HierarchyIndex (facts by product, sorted by period)
//!        │
//!        ├──► compute_aggregates (level, volume type) ──► Vec<ComputedAggregate>
//!        │
//!        └──► aggregate_series (path) ──► Vec<SeriesPoint> (detail view)
//! ```
//!
//! Everything here is a pure function of its inputs: no caching, no shared
//! mutable state. Callers recompute in full whenever level, volume type or
//! data changes.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod series;
pub mod synthetic;

pub use aggregation::{
    abc_classes, coefficient_of_variation, compute_aggregates, xyz_class, AggregationEngine,
};
pub use config::{
    ChartSettings, ClassificationConfig, ConfigLoader, DashboardConfig, DataConfig, SeriesConfig,
};
pub use error::{ConfigError, EngineError};
pub use export::{aggregates_file_name, series_file_name, write_aggregates_csv, write_series_csv};
pub use hierarchy::HierarchyIndex;
pub use series::aggregate_series;
pub use synthetic::SyntheticDemand;
