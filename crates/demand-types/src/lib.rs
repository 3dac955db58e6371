//! Shared Types for Demand Lens
//!
//! This crate is the SINGLE SOURCE OF TRUTH for the demand-analysis data model.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐         ┌──────────────────┐
//! │  demand-engine   │ ──────► │  demand-graph    │ ──────► │  demand-lens UI  │
//! │  (aggregation)   │  Vec<   │  (layout/render) │  Rect/  │  (egui app)      │
//! └──────────────────┘  Agg>   └──────────────────┘  Arc    └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Reference data (`Product`, `TimeSeriesFact`) is immutable once loaded
//! 2. JSON field names are camelCase to match the dashboard export shape
//! 3. Enumerations never coerce bad input - parse failures are `TypeError`

pub mod aggregate;
pub mod product;
pub mod series;

pub use aggregate::*;
pub use product::*;
pub use series::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Hierarchy level must be 1..=4, got {0}")]
    InvalidHierarchyLevel(u8),

    #[error("Invalid period '{0}' (expected YYYY-MM)")]
    InvalidPeriod(String),

    #[error("Unknown volume type: {0}")]
    UnknownVolumeType(String),
}

// ============================================================================
// HIERARCHY LEVEL
// ============================================================================

/// Depth in the 4-level product taxonomy
/// (category → subcategory → product line → SKU)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HierarchyLevel {
    L1,
    L2,
    L3,
    #[default]
    L4,
}

impl HierarchyLevel {
    pub const ALL: [HierarchyLevel; 4] = [
        HierarchyLevel::L1,
        HierarchyLevel::L2,
        HierarchyLevel::L3,
        HierarchyLevel::L4,
    ];

    /// Number of path segments at this level
    pub fn depth(self) -> usize {
        match self {
            HierarchyLevel::L1 => 1,
            HierarchyLevel::L2 => 2,
            HierarchyLevel::L3 => 3,
            HierarchyLevel::L4 => 4,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HierarchyLevel::L1 => "Level 1",
            HierarchyLevel::L2 => "Level 2",
            HierarchyLevel::L3 => "Level 3",
            HierarchyLevel::L4 => "Level 4",
        }
    }
}

impl TryFrom<u8> for HierarchyLevel {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HierarchyLevel::L1),
            2 => Ok(HierarchyLevel::L2),
            3 => Ok(HierarchyLevel::L3),
            4 => Ok(HierarchyLevel::L4),
            other => Err(TypeError::InvalidHierarchyLevel(other)),
        }
    }
}

impl From<HierarchyLevel> for u8 {
    fn from(level: HierarchyLevel) -> Self {
        level.depth() as u8
    }
}

// ============================================================================
// VOLUME TYPE
// ============================================================================

/// Which scalar drives ABC ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    Quantity,
    #[default]
    Monetary,
}

impl VolumeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeType::Quantity => "quantity",
            VolumeType::Monetary => "monetary",
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            VolumeType::Quantity => "Quantity",
            VolumeType::Monetary => "Monetary",
        }
    }

    /// Label used in tooltips ("Revenue: $1.2M" / "Qty: 12K")
    pub fn metric_label(&self) -> &'static str {
        match self {
            VolumeType::Quantity => "Qty",
            VolumeType::Monetary => "Revenue",
        }
    }
}

impl std::str::FromStr for VolumeType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quantity" | "qty" => Ok(VolumeType::Quantity),
            "monetary" | "revenue" => Ok(VolumeType::Monetary),
            other => Err(TypeError::UnknownVolumeType(other.to_string())),
        }
    }
}

// ============================================================================
// PAGE TABS
// ============================================================================

/// Demand Analysis page tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemandTab {
    #[default]
    AbcXyz,
    Sunburst,
}

impl DemandTab {
    pub fn display_name(&self) -> &'static str {
        match self {
            DemandTab::AbcXyz => "ABC-XYZ Analysis",
            DemandTab::Sunburst => "Hierarchy Breakdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_level_try_from() {
        assert_eq!(HierarchyLevel::try_from(1), Ok(HierarchyLevel::L1));
        assert_eq!(HierarchyLevel::try_from(4), Ok(HierarchyLevel::L4));
        assert_eq!(
            HierarchyLevel::try_from(0),
            Err(TypeError::InvalidHierarchyLevel(0))
        );
        assert_eq!(
            HierarchyLevel::try_from(5),
            Err(TypeError::InvalidHierarchyLevel(5))
        );
    }

    #[test]
    fn test_hierarchy_level_serde_as_number() {
        let json = serde_json::to_string(&HierarchyLevel::L3).unwrap();
        assert_eq!(json, "3");
        let back: HierarchyLevel = serde_json::from_str("2").unwrap();
        assert_eq!(back, HierarchyLevel::L2);
        assert!(serde_json::from_str::<HierarchyLevel>("7").is_err());
    }

    #[test]
    fn test_volume_type_parse() {
        assert_eq!("monetary".parse::<VolumeType>(), Ok(VolumeType::Monetary));
        assert_eq!("QTY".parse::<VolumeType>(), Ok(VolumeType::Quantity));
        assert!("units".parse::<VolumeType>().is_err());
        assert_eq!(
            serde_json::to_string(&VolumeType::Quantity).unwrap(),
            "\"quantity\""
        );
    }
}
