//! Demand Lens - demand analysis dashboard
//!
//! Desktop front end over `demand-engine` (aggregation and classification)
//! and `demand-graph` (ABC-XYZ treemap, sunburst, time-series chart).

pub mod app;
pub mod export;
pub mod panels;

pub use app::DemandAnalysisApp;
