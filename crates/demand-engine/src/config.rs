//! Dashboard configuration
//!
//! Loads and validates the YAML configuration file. Every section has
//! defaults, so a missing file or missing keys fall back to the standard
//! ABC-XYZ setup (12-month window, 20/60 % Pareto bands, 20/40 % CV bands).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DEMAND_CONFIG";

/// Default config location relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.yaml";

// =============================================================================
// SECTIONS
// =============================================================================

/// Thresholds and window used by the aggregation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Number of trailing periods per product
    pub trailing_window: usize,
    /// Cumulative share (0..1) up to which groups are class A
    pub abc_a_share: f64,
    /// Cumulative share (0..1) up to which groups are class B
    pub abc_b_share: f64,
    /// CV percent up to which groups are class X
    pub xyz_x_max: f64,
    /// CV percent up to which groups are class Y
    pub xyz_y_max: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            trailing_window: 12,
            abc_a_share: 0.2,
            abc_b_share: 0.6,
            xyz_x_max: 20.0,
            xyz_y_max: 40.0,
        }
    }
}

impl ClassificationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trailing_window == 0 {
            return Err(ConfigError::Invalid(
                "classification.trailing_window must be at least 1".into(),
            ));
        }
        let shares_ok = 0.0 <= self.abc_a_share
            && self.abc_a_share <= self.abc_b_share
            && self.abc_b_share <= 1.0;
        if !shares_ok {
            return Err(ConfigError::Invalid(format!(
                "ABC shares must satisfy 0 <= a <= b <= 1 (a={}, b={})",
                self.abc_a_share, self.abc_b_share
            )));
        }
        if !(0.0 <= self.xyz_x_max && self.xyz_x_max <= self.xyz_y_max) {
            return Err(ConfigError::Invalid(format!(
                "XYZ bands must satisfy 0 <= x <= y (x={}, y={})",
                self.xyz_x_max, self.xyz_y_max
            )));
        }
        Ok(())
    }
}

/// Synthetic data generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub seed: u64,
    pub product_count: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            product_count: 200,
        }
    }
}

/// Time-series detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Periods shown in the detail chart
    pub window: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self { window: 24 }
    }
}

/// Chart geometry and label policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Gutter between treemap cells and their sub-boxes
    pub treemap_gutter: f32,
    /// Height of the class label band at the top of each treemap cell
    pub treemap_label_band: f32,
    /// Minimum sub-box width for a label
    pub treemap_label_min_width: f32,
    /// Minimum sub-box height for a label
    pub treemap_label_min_height: f32,
    /// Radius of the sunburst hub
    pub sunburst_inner_radius: f32,
    /// Width of each sunburst ring
    pub sunburst_ring_width: f32,
    /// Minimum arc length (at mid radius) for a label
    pub sunburst_label_min_arc: f32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            treemap_gutter: 1.5,
            treemap_label_band: 16.0,
            treemap_label_min_width: 28.0,
            treemap_label_min_height: 12.0,
            sunburst_inner_radius: 60.0,
            sunburst_ring_width: 66.0,
            sunburst_label_min_arc: 14.0,
        }
    }
}

/// Full dashboard configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub classification: ClassificationConfig,
    pub data: DataConfig,
    pub series: SeriesConfig,
    pub charts: ChartSettings,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classification.validate()?;
        if self.series.window == 0 {
            return Err(ConfigError::Invalid("series.window must be at least 1".into()));
        }
        if self.charts.sunburst_ring_width <= 0.0 {
            return Err(ConfigError::Invalid(
                "charts.sunburst_ring_width must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate YAML text
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// LOADER
// =============================================================================

pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loader that always yields defaults
    pub fn defaults() -> Self {
        Self { path: None }
    }

    /// Create loader from DEMAND_CONFIG env var or default path
    ///
    /// Path resolution order:
    /// 1. DEMAND_CONFIG environment variable (explicit override, must exist)
    /// 2. Relative "config/dashboard.yaml" (works when running from workspace root)
    /// 3. Built-in defaults
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::new(path);
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::new(DEFAULT_CONFIG_PATH);
        }
        Self::defaults()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Result<DashboardConfig, ConfigError> {
        let Some(path) = &self.path else {
            warn!("No dashboard config file found, using defaults");
            return Ok(DashboardConfig::default());
        };

        info!("Loading dashboard configuration from {}", path.display());
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        DashboardConfig::from_yaml(&content, &display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DashboardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "classification:\n  trailing_window: 6\n";
        let config = DashboardConfig::from_yaml(yaml, "inline").unwrap();
        assert_eq!(config.classification.trailing_window, 6);
        assert_eq!(config.classification.abc_a_share, 0.2);
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn test_rejects_inverted_abc_shares() {
        let yaml = "classification:\n  abc_a_share: 0.7\n  abc_b_share: 0.6\n";
        let err = DashboardConfig::from_yaml(yaml, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = DashboardConfig::from_yaml("classification: [", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::defaults().load().unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_loader_missing_file_is_read_error() {
        let err = ConfigLoader::new("/nonexistent/dashboard.yaml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
