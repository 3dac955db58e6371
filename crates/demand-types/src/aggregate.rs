//! Computed aggregates and ABC/XYZ classes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::split_path;

/// Keys of the `aggregates` map on every `ComputedAggregate`
pub mod keys {
    pub const TOTAL_VOLUME: &str = "total-volume";
    pub const TOTAL_QUANTITY: &str = "total-quantity";
    pub const AVG_LAG1_ERROR: &str = "avg-lag1-error";
    pub const AVG_LAG5_ERROR: &str = "avg-lag5-error";
}

// ============================================================================
// CLASSES
// ============================================================================

/// Pareto class on cumulative volume share
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    pub const ALL: [AbcClass; 3] = [AbcClass::A, AbcClass::B, AbcClass::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Demand variability band on coefficient of variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum XyzClass {
    X,
    Y,
    Z,
}

impl XyzClass {
    pub const ALL: [XyzClass; 3] = [XyzClass::X, XyzClass::Y, XyzClass::Z];

    pub fn as_str(&self) -> &'static str {
        match self {
            XyzClass::X => "X",
            XyzClass::Y => "Y",
            XyzClass::Z => "Z",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

// ============================================================================
// COMPUTED AGGREGATE
// ============================================================================

/// One hierarchy group rolled up over its trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedAggregate {
    /// Hierarchy path with `/` replaced by `-`
    pub element_id: String,
    /// e.g. "Apparel/Men's Casual/T-Shirts/SKU-0001-Core"
    pub hierarchy_path: String,
    /// ABC-driving volume (quantity or monetary)
    pub volume_total: f64,
    /// Coefficient of variation of monthly quantity, in percent
    pub variance_percent: f64,
    pub abc_class: AbcClass,
    pub xyz_class: XyzClass,
    /// All configured aggregates, keyed by `keys::*`
    pub aggregates: BTreeMap<String, f64>,
}

impl ComputedAggregate {
    /// Last path segment
    pub fn display_name(&self) -> &str {
        split_path(&self.hierarchy_path).last().unwrap_or("")
    }

    /// Path segments above the display name
    pub fn ancestors(&self) -> Vec<&str> {
        let mut parts: Vec<&str> = split_path(&self.hierarchy_path).collect();
        parts.pop();
        parts
    }

    /// Ancestors joined for tooltips, e.g. "Apparel › Kids › Shorts"
    pub fn breadcrumb(&self) -> String {
        self.ancestors().join(" › ")
    }

    /// Number of segments in the hierarchy path
    pub fn depth(&self) -> usize {
        split_path(&self.hierarchy_path).count()
    }

    /// Combined cell key, e.g. "AX"
    pub fn class_key(&self) -> String {
        format!("{}{}", self.abc_class.as_str(), self.xyz_class.as_str())
    }

    pub fn aggregate(&self, key: &str) -> Option<f64> {
        self.aggregates.get(key).copied()
    }
}

/// Element id for a hierarchy path
pub fn element_id_for(path: &str) -> String {
    path.replace('/', "-")
}
