//! Spatial index for treemap hit testing
//!
//! Uses R-tree (via `rstar`) for O(log n) lookups instead of a linear scan
//! over every sub-box. Level-4 views place a few hundred boxes.

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use crate::treemap::{MatrixLayout, TreemapRect};

/// Spatial index entry for one drawn sub-box
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialBox {
    /// Index into the aggregate slice
    pub index: usize,
    pub rect: TreemapRect,
    bounds: AABB<[f32; 2]>,
}

impl SpatialBox {
    pub fn new(index: usize, rect: TreemapRect) -> Self {
        Self {
            index,
            rect,
            bounds: AABB::from_corners(rect.min(), rect.max()),
        }
    }

    pub fn bounds(&self) -> &AABB<[f32; 2]> {
        &self.bounds
    }
}

impl RTreeObject for SpatialBox {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for SpatialBox {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        self.bounds.distance_2(point)
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.bounds.contains_point(point)
    }
}

/// R-tree over the sub-boxes of one matrix layout
#[derive(Clone)]
pub struct SpatialIndex {
    tree: RTree<SpatialBox>,
    count: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            count: 0,
        }
    }

    pub fn from_boxes(boxes: impl Iterator<Item = SpatialBox>) -> Self {
        let boxes: Vec<_> = boxes.collect();
        let count = boxes.len();
        Self {
            tree: RTree::bulk_load(boxes),
            count,
        }
    }

    /// Index every sub-box with a drawable rectangle
    pub fn from_layout(layout: &MatrixLayout) -> Self {
        Self::from_boxes(
            layout
                .placed_items()
                .filter(|(_, _, rect)| rect.w >= 1.0 && rect.h >= 1.0)
                .map(|(_, index, rect)| SpatialBox::new(index, rect)),
        )
    }

    /// Rebuild after the layout changed
    pub fn rebuild(&mut self, layout: &MatrixLayout) {
        *self = Self::from_layout(layout);
    }

    /// Box under `point`; the smallest one wins where boxes touch
    pub fn hit_test(&self, point: [f32; 2]) -> Option<&SpatialBox> {
        self.tree
            .locate_all_at_point(&point)
            .min_by(|a, b| a.rect.area().total_cmp(&b.rect.area()))
    }

    pub fn find_by_index(&self, index: usize) -> Option<&SpatialBox> {
        self.tree.iter().find(|b| b.index == index)
    }

    /// Boxes intersecting a rectangle
    pub fn query_rect(&self, min: [f32; 2], max: [f32; 2]) -> Vec<&SpatialBox> {
        let bounds = AABB::from_corners(min, max);
        self.tree.locate_in_envelope_intersecting(&bounds).collect()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpatialBox> {
        self.tree.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treemap::squarify;

    fn grid(count: usize) -> Vec<SpatialBox> {
        (0..count)
            .map(|i| {
                let x = (i % 10) as f32 * 20.0;
                let y = (i / 10) as f32 * 20.0;
                SpatialBox::new(i, TreemapRect::new(x, y, 18.0, 18.0))
            })
            .collect()
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new();
        assert!(index.is_empty());
        assert!(index.hit_test([0.0, 0.0]).is_none());
    }

    #[test]
    fn test_hit_inside_and_gap() {
        let index = SpatialIndex::from_boxes(grid(100).into_iter());
        assert_eq!(index.len(), 100);

        assert_eq!(index.hit_test([25.0, 5.0]).map(|b| b.index), Some(1));
        assert_eq!(index.hit_test([185.0, 185.0]).map(|b| b.index), Some(99));
        // gutter between boxes
        assert!(index.hit_test([19.0, 5.0]).is_none());
        assert!(index.hit_test([500.0, 500.0]).is_none());
    }

    #[test]
    fn test_matches_squarified_rects() {
        let container = TreemapRect::new(0.0, 0.0, 200.0, 100.0);
        let rects = squarify(&[5.0, 3.0, 1.0, 1.0], container);
        let index =
            SpatialIndex::from_boxes(rects.iter().enumerate().map(|(i, r)| SpatialBox::new(i, *r)));

        for (i, rect) in rects.iter().enumerate() {
            let hit = index.hit_test(rect.center()).unwrap();
            assert_eq!(hit.index, i);
        }
    }

    #[test]
    fn test_query_rect() {
        let index = SpatialIndex::from_boxes(grid(20).into_iter());
        let found = index.query_rect([0.0, 0.0], [30.0, 10.0]);
        assert_eq!(found.len(), 2);
        assert!(index.find_by_index(7).is_some());
        assert!(index.find_by_index(70).is_none());
    }
}
