//! Product taxonomy entries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::HierarchyLevel;

/// Separator between taxonomy segments in a hierarchy path
pub const PATH_SEPARATOR: char = '/';

/// One SKU's position in the 4-level taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    /// Top-level category (e.g. "Apparel")
    pub level1: String,
    /// Subcategory (e.g. "Men's Casual")
    pub level2: String,
    /// Product line (e.g. "T-Shirts")
    pub level3: String,
    /// SKU
    pub level4: String,
    pub launch_date: NaiveDate,
    pub eol_date: NaiveDate,
}

impl Product {
    /// Taxonomy segment at the given level
    pub fn segment(&self, level: HierarchyLevel) -> &str {
        match level {
            HierarchyLevel::L1 => &self.level1,
            HierarchyLevel::L2 => &self.level2,
            HierarchyLevel::L3 => &self.level3,
            HierarchyLevel::L4 => &self.level4,
        }
    }

    /// Segments from level 1 down to and including `level`
    pub fn segments(&self, level: HierarchyLevel) -> impl Iterator<Item = &str> {
        HierarchyLevel::ALL
            .into_iter()
            .take(level.depth())
            .map(move |l| self.segment(l))
    }

    /// `/`-joined path prefix at the given depth
    pub fn path_at(&self, level: HierarchyLevel) -> String {
        self.segments(level).collect::<Vec<_>>().join("/")
    }

    /// Full 4-level path
    pub fn full_path(&self) -> String {
        self.path_at(HierarchyLevel::L4)
    }

    /// Whether this product sits under `path` (whole-segment prefix match)
    pub fn is_under(&self, path: &str) -> bool {
        let wanted: Vec<&str> = split_path(path).collect();
        if wanted.is_empty() || wanted.len() > 4 {
            return false;
        }
        HierarchyLevel::ALL
            .iter()
            .zip(wanted.iter())
            .all(|(level, seg)| self.segment(*level) == *seg)
    }
}

/// Split a hierarchy path into its segments
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}
