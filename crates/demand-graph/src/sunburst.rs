//! Sunburst layout
//!
//! Builds a rooted tree from flat `/`-separated hierarchy paths and assigns
//! each node an angular span proportional to its share of the parent's
//! volume. Rings are concentric: level 1 innermost.
//!
//! ```text
//!            start = -90° (12 o'clock), clockwise
//!                 ┌───────────┐
//!           ring 4│  ring 3   │   span(child) = span(parent)
//!                 │ ┌───────┐ │               × volume(child) / volume(parent)
//!                 │ │ hub   │ │
//!                 │ └───────┘ │   color = plasma((var - min) / (max - min))
//!                 └───────────┘
//! ```
//!
//! Nodes live in an arena (`Vec<SunburstNode>`) addressed by [`NodeId`].
//! Traversal is top-down through `children`; `parent` is kept only for
//! breadcrumbs and debugging.

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use demand_types::{split_path, ComputedAggregate};
use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::colors::plasma_color;

/// Spans at or below this are treated as empty
pub const MIN_SPAN: f32 = 1e-9;

/// Start of the root span (12 o'clock)
pub const START_ANGLE: f32 = -FRAC_PI_2;

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SunburstNode {
    pub id: NodeId,
    /// Last path segment
    pub label: String,
    /// 0 for the root, 1..=4 for taxonomy levels
    pub level: usize,
    pub path: String,
    pub volume: f64,
    /// Σ variance × volume over the leaves below
    variance_weighted_sum: f64,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub start_angle: f32,
    pub end_angle: f32,
    pub color: Color32,
    /// Index of the source aggregate for nodes that end a path
    pub aggregate: Option<usize>,
}

impl SunburstNode {
    fn new(id: NodeId, label: &str, level: usize, path: String, parent: Option<NodeId>) -> Self {
        Self {
            id,
            label: label.to_string(),
            level,
            path,
            volume: 0.0,
            variance_weighted_sum: 0.0,
            children: Vec::new(),
            parent,
            start_angle: 0.0,
            end_angle: 0.0,
            color: Color32::TRANSPARENT,
            aggregate: None,
        }
    }

    /// Volume-weighted mean variance of the leaves below (0 for no volume)
    pub fn variance_percent(&self) -> f64 {
        if self.volume > 0.0 {
            self.variance_weighted_sum / self.volume
        } else {
            0.0
        }
    }

    pub fn span(&self) -> f32 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Zero-width nodes stay in the tree but are not drawn or hit
    pub fn is_visible(&self) -> bool {
        self.span() > MIN_SPAN
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Ancestor segments joined with " › "
    pub fn breadcrumb(&self) -> String {
        let mut parts: Vec<&str> = split_path(&self.path).collect();
        parts.pop();
        parts.join(" › ")
    }

    pub fn contains_angle(&self, angle: f32) -> bool {
        self.is_visible() && angle >= self.start_angle && angle < self.end_angle
    }
}

/// One input path for the tree
#[derive(Debug, Clone, PartialEq)]
pub struct SunburstEntry<'a> {
    pub path: &'a str,
    pub volume: f64,
    pub variance_percent: f64,
    pub source: Option<usize>,
}

// =============================================================================
// TREE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SunburstTree {
    nodes: Vec<SunburstNode>,
    min_variance: f64,
    max_variance: f64,
}

impl Default for SunburstTree {
    fn default() -> Self {
        Self::build(std::iter::empty())
    }
}

impl SunburstTree {
    /// Build, lay out and color the tree for a set of aggregates
    pub fn from_aggregates(aggregates: &[ComputedAggregate]) -> Self {
        let entries = aggregates.iter().enumerate().map(|(i, agg)| SunburstEntry {
            path: &agg.hierarchy_path,
            volume: agg.volume_total,
            variance_percent: agg.variance_percent,
            source: Some(i),
        });
        let mut tree = Self::build(entries);
        tree.layout(START_ANGLE, START_ANGLE + TAU);
        tree.assign_colors();
        tree
    }

    /// Insert every entry level by level; volumes and weighted variance
    /// accumulate on every node along the path
    pub fn build<'a>(entries: impl IntoIterator<Item = SunburstEntry<'a>>) -> Self {
        let mut nodes = vec![SunburstNode::new(NodeId::ROOT, "", 0, String::new(), None)];
        let mut by_path: HashMap<String, NodeId> = HashMap::new();

        for entry in entries {
            let volume = if entry.volume.is_finite() { entry.volume.max(0.0) } else { 0.0 };
            let weighted = entry.variance_percent * volume;
            nodes[0].volume += volume;
            nodes[0].variance_weighted_sum += weighted;

            let segments: Vec<&str> = split_path(entry.path).collect();
            let mut current = NodeId::ROOT;
            for (depth, segment) in segments.iter().enumerate() {
                let path = segments[..=depth].join("/");
                let id = match by_path.get(&path) {
                    Some(id) => *id,
                    None => {
                        let id = NodeId(nodes.len());
                        nodes.push(SunburstNode::new(
                            id,
                            segment,
                            depth + 1,
                            path.clone(),
                            Some(current),
                        ));
                        nodes[current.0].children.push(id);
                        by_path.insert(path, id);
                        id
                    }
                };
                let node = &mut nodes[id.0];
                node.volume += volume;
                node.variance_weighted_sum += weighted;
                if depth + 1 == segments.len() {
                    node.aggregate = entry.source;
                }
                current = id;
            }
        }

        Self {
            nodes,
            min_variance: 0.0,
            max_variance: 0.0,
        }
    }

    /// Assign angular spans top-down; siblings ordered by volume descending
    pub fn layout(&mut self, start: f32, end: f32) {
        self.nodes[0].start_angle = start;
        self.nodes[0].end_angle = end;

        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let mut children = std::mem::take(&mut self.nodes[id.0].children);
            children.sort_by(|a, b| {
                self.nodes[b.0].volume.total_cmp(&self.nodes[a.0].volume)
            });

            let parent = &self.nodes[id.0];
            let (parent_volume, parent_span) = (parent.volume, parent.span());
            let mut cursor = parent.start_angle;
            for child in &children {
                let share = if parent_volume > 0.0 {
                    (self.nodes[child.0].volume / parent_volume) as f32
                } else {
                    0.0
                };
                let span = parent_span * share;
                let node = &mut self.nodes[child.0];
                node.start_angle = cursor;
                node.end_angle = cursor + span;
                cursor += span;
                stack.push(*child);
            }
            self.nodes[id.0].children = children;
        }
    }

    /// Color every node by its variance relative to the global range
    pub fn assign_colors(&mut self) {
        let (min, max) = self
            .nodes
            .iter()
            .filter(|n| (1..=4).contains(&n.level))
            .map(SunburstNode::variance_percent)
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 0.0));
        self.min_variance = min;
        self.max_variance = max;

        for node in self.nodes.iter_mut().skip(1) {
            let t = normalize(node.variance_percent(), min, max);
            node.color = plasma_color(t as f32);
        }
    }

    pub fn root(&self) -> &SunburstNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&SunburstNode> {
        self.nodes.get(id.0)
    }

    pub fn find(&self, path: &str) -> Option<&SunburstNode> {
        self.nodes.iter().skip(1).find(|n| n.path == path)
    }

    /// Every node except the root, parents before children
    pub fn nodes(&self) -> impl Iterator<Item = &SunburstNode> {
        self.nodes.iter().skip(1)
    }

    /// Nodes that take up space on screen
    pub fn visible_nodes(&self) -> impl Iterator<Item = &SunburstNode> {
        self.nodes().filter(|n| n.is_visible() && n.level <= 4)
    }

    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn variance_range(&self) -> (f64, f64) {
        (self.min_variance, self.max_variance)
    }

    /// Node under `offset` (pointer minus chart center)
    pub fn hit_test(&self, geometry: &RingGeometry, offset: [f32; 2]) -> Option<&SunburstNode> {
        let (radius, angle) = to_polar(offset);
        let level = geometry.level_at(radius)?;
        self.nodes()
            .filter(|n| n.level == level)
            .find(|n| n.contains_angle(angle))
    }
}

/// Position of `v` in [min, max]; 0.5 when the range is empty
pub fn normalize(v: f64, min: f64, max: f64) -> f64 {
    if max == min {
        0.5
    } else {
        (v - min) / (max - min)
    }
}

/// (radius, angle) with the angle in [-π/2, 3π/2) to match the layout start
pub fn to_polar(offset: [f32; 2]) -> (f32, f32) {
    let radius = (offset[0] * offset[0] + offset[1] * offset[1]).sqrt();
    let mut angle = offset[1].atan2(offset[0]);
    if angle < START_ANGLE {
        angle += TAU;
    }
    (radius, angle)
}

/// Legend ticks top to bottom: (t, variance at t)
pub fn legend_ticks(min: f64, max: f64) -> [(f32, f64); 5] {
    [1.0, 0.75, 0.5, 0.25, 0.0].map(|t| (t, min + t as f64 * (max - min)))
}

// =============================================================================
// RING GEOMETRY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingGeometry {
    pub inner_radius: f32,
    pub ring_width: f32,
    /// Radial padding inside each ring, leaves a hairline between rings
    pub padding: f32,
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self {
            inner_radius: 60.0,
            ring_width: 66.0,
            padding: 0.8,
        }
    }
}

impl RingGeometry {
    /// (inner, outer) radius of a ring
    pub fn radii(&self, level: usize) -> (f32, f32) {
        let r1 = self.inner_radius + level.saturating_sub(1) as f32 * self.ring_width;
        (r1, r1 + self.ring_width)
    }

    pub fn mid_radius(&self, level: usize) -> f32 {
        let (r1, r2) = self.radii(level);
        (r1 + r2) / 2.0
    }

    pub fn outer_radius(&self, levels: usize) -> f32 {
        self.inner_radius + levels as f32 * self.ring_width
    }

    /// Ring level (1..=4) containing `radius`
    pub fn level_at(&self, radius: f32) -> Option<usize> {
        if radius < self.inner_radius || self.ring_width <= 0.0 {
            return None;
        }
        let level = ((radius - self.inner_radius) / self.ring_width).floor() as usize + 1;
        (level <= 4).then_some(level)
    }

    /// Arc length at mid radius
    pub fn arc_len(&self, node: &SunburstNode) -> f32 {
        self.mid_radius(node.level) * node.span()
    }

    /// Label anchor: mid angle at mid radius
    pub fn label_anchor(&self, center: Pos2, node: &SunburstNode) -> Pos2 {
        polar_point(center, self.mid_radius(node.level), node.mid_angle())
    }

    /// (inner, outer) point pairs along the segment, ready for a triangle
    /// strip; empty for invisible nodes
    pub fn arc_strip(&self, center: Pos2, node: &SunburstNode) -> Vec<(Pos2, Pos2)> {
        if !node.is_visible() {
            return Vec::new();
        }
        let (r1, r2) = self.radii(node.level);
        let (r1, r2) = (r1 + self.padding, r2 - self.padding);
        let a1 = node.start_angle;
        let a2 = if node.span() >= TAU - 1e-6 {
            a1 + TAU - 1e-6
        } else {
            node.end_angle
        };

        // ~2° per step keeps the outer ring smooth
        let steps = (((a2 - a1) / (PI / 90.0)).ceil() as usize).max(1);
        (0..=steps)
            .map(|i| {
                let a = a1 + (a2 - a1) * i as f32 / steps as f32;
                (polar_point(center, r1, a), polar_point(center, r2, a))
            })
            .collect()
    }
}

pub fn polar_point(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    Pos2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(path: &str, volume: f64, variance: f64) -> SunburstEntry<'_> {
        SunburstEntry {
            path,
            volume,
            variance_percent: variance,
            source: None,
        }
    }

    fn laid_out(entries: Vec<SunburstEntry<'_>>) -> SunburstTree {
        let mut tree = SunburstTree::build(entries);
        tree.layout(START_ANGLE, START_ANGLE + TAU);
        tree.assign_colors();
        tree
    }

    #[test]
    fn test_volume_weighted_variance() {
        let tree = laid_out(vec![entry("P/a", 100.0, 10.0), entry("P/b", 300.0, 30.0)]);
        let parent = tree.find("P").unwrap();
        assert_eq!(parent.volume, 400.0);
        assert_eq!(parent.variance_percent(), 25.0);
    }

    #[test]
    fn test_children_sorted_and_contiguous() {
        let tree = laid_out(vec![
            entry("A/x", 10.0, 1.0),
            entry("A/y", 30.0, 1.0),
            entry("B/z", 60.0, 1.0),
        ]);
        let root = tree.root();
        let first = tree.node(root.children[0]).unwrap();
        assert_eq!(first.path, "B");
        assert!((first.start_angle - START_ANGLE).abs() < 1e-6);
        assert!((first.span() - TAU * 0.6).abs() < 1e-5);

        let a = tree.find("A").unwrap();
        let y = tree.node(a.children[0]).unwrap();
        assert_eq!(y.label, "y");
        assert!((y.start_angle - a.start_angle).abs() < 1e-6);
        assert!((y.span() - a.span() * 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_zero_volume_node_kept_but_hidden() {
        let tree = laid_out(vec![entry("A/x", 10.0, 1.0), entry("A/empty", 0.0, 50.0)]);
        let empty = tree.find("A/empty").unwrap();
        assert_eq!(empty.span(), 0.0);
        assert!(!empty.is_visible());
        assert_eq!(tree.visible_nodes().count(), 2);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_uniform_variance_is_mid_plasma() {
        let tree = laid_out(vec![entry("A", 1.0, 5.0), entry("B", 2.0, 5.0)]);
        assert_eq!(tree.variance_range(), (5.0, 5.0));
        for node in tree.nodes() {
            assert_eq!(node.color, plasma_color(0.5));
        }
    }

    #[test]
    fn test_hit_test_polar() {
        let tree = laid_out(vec![entry("A/x", 50.0, 1.0), entry("B/y", 50.0, 1.0)]);
        let geometry = RingGeometry::default();

        // straight up is the start of the first (A) span on ring 1
        let hit = tree.hit_test(&geometry, [0.5, -90.0]).unwrap();
        assert_eq!(hit.path, "A");
        // ring 2, left side: second half of the circle -> B
        let hit = tree.hit_test(&geometry, [-150.0, 0.0]).unwrap();
        assert_eq!(hit.path, "B/y");
        // inside the hub
        assert!(tree.hit_test(&geometry, [10.0, 10.0]).is_none());
        // beyond the populated rings
        assert!(tree.hit_test(&geometry, [0.0, 250.0]).is_none());
    }

    #[test]
    fn test_ring_geometry() {
        let g = RingGeometry::default();
        assert_eq!(g.radii(1), (60.0, 126.0));
        assert_eq!(g.radii(4), (258.0, 324.0));
        assert_eq!(g.level_at(59.0), None);
        assert_eq!(g.level_at(60.0), Some(1));
        assert_eq!(g.level_at(200.0), Some(3));
        assert_eq!(g.level_at(330.0), None);
    }

    #[test]
    fn test_polar_angle_range() {
        let (_, up) = to_polar([0.0, -1.0]);
        assert!((up - START_ANGLE).abs() < 1e-6);
        let (_, left) = to_polar([-1.0, 0.0]);
        assert!((left - PI).abs() < 1e-6);
        let (_, up_left) = to_polar([-1.0, -1.0]);
        assert!(up_left > PI && up_left < 3.0 * FRAC_PI_2);
    }

    #[test]
    fn test_legend_ticks() {
        let ticks = legend_ticks(10.0, 50.0);
        assert_eq!(ticks[0], (1.0, 50.0));
        assert_eq!(ticks[2], (0.5, 30.0));
        assert_eq!(ticks[4], (0.0, 10.0));
    }
}
