//! Layout invariants: treemap partition, sunburst coverage, matrix bands

use std::collections::BTreeMap;
use std::f32::consts::TAU;

use demand_graph::sunburst::{SunburstEntry, START_ANGLE};
use demand_graph::{
    matrix_layout, plasma_color, squarify, MatrixStyle, RingGeometry, SpatialIndex, SunburstTree,
    TreemapRect,
};
use demand_types::{element_id_for, AbcClass, ComputedAggregate, XyzClass};
use egui::Color32;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn aggregate(
    path: &str,
    volume: f64,
    variance: f64,
    abc: AbcClass,
    xyz: XyzClass,
) -> ComputedAggregate {
    ComputedAggregate {
        element_id: element_id_for(path),
        hierarchy_path: path.to_string(),
        volume_total: volume,
        variance_percent: variance,
        abc_class: abc,
        xyz_class: xyz,
        aggregates: BTreeMap::new(),
    }
}

fn overlap(a: &TreemapRect, b: &TreemapRect) -> f32 {
    let w = (a.x + a.w).min(b.x + b.w) - a.x.max(b.x);
    let h = (a.y + a.h).min(b.y + b.h) - a.y.max(b.y);
    w.max(0.0) * h.max(0.0)
}

proptest! {
    #[test]
    fn squarify_tiles_container(
        weights in prop::collection::vec(0.1f64..1000.0, 1..40),
        w in 10.0f32..800.0,
        h in 10.0f32..600.0,
    ) {
        let container = TreemapRect::new(3.0, 7.0, w, h);
        let rects = squarify(&weights, container);
        prop_assert_eq!(rects.len(), weights.len());

        let area = container.area();
        let total: f64 = weights.iter().sum();
        let covered: f32 = rects.iter().map(TreemapRect::area).sum();
        prop_assert!((covered - area).abs() <= area * 1e-3);

        for (rect, weight) in rects.iter().zip(&weights) {
            prop_assert!(rect.x.is_finite() && rect.y.is_finite());
            prop_assert!(rect.w >= 0.0 && rect.h >= 0.0);
            prop_assert!(rect.x >= container.x - 1e-2);
            prop_assert!(rect.y >= container.y - 1e-2);
            prop_assert!(rect.x + rect.w <= container.x + container.w + 1e-2);
            prop_assert!(rect.y + rect.h <= container.y + container.h + 1e-2);

            let expected = (weight / total) as f32 * area;
            prop_assert!((rect.area() - expected).abs() <= area * 1e-3 + 1e-2);
        }

        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                prop_assert!(overlap(&rects[i], &rects[j]) <= area * 1e-4 + 1e-2);
            }
        }
    }

    #[test]
    fn sunburst_children_cover_parent_span(
        leaves in prop::collection::vec((0u8..3, 0u8..3, 0.0f64..500.0, 0.0f64..80.0), 1..30),
    ) {
        let paths: Vec<String> = leaves
            .iter()
            .enumerate()
            .map(|(i, (a, b, _, _))| format!("L{a}/M{b}/leaf{i}"))
            .collect();
        let entries = leaves
            .iter()
            .zip(&paths)
            .map(|((_, _, v, var), path)| SunburstEntry {
                path: path.as_str(),
                volume: *v,
                variance_percent: *var,
                source: None,
            });
        let mut tree = SunburstTree::build(entries);
        tree.layout(START_ANGLE, START_ANGLE + TAU);
        tree.assign_colors();

        for node in tree.nodes() {
            if node.is_leaf() || node.volume <= 0.0 {
                continue;
            }
            let covered: f32 = node
                .children
                .iter()
                .filter_map(|id| tree.node(*id))
                .map(|c| c.span())
                .sum();
            prop_assert!((covered - node.span()).abs() < 1e-3);

            let mut cursor = node.start_angle;
            for child in node.children.iter().filter_map(|id| tree.node(*id)) {
                prop_assert!((child.start_angle - cursor).abs() < 1e-3);
                cursor = child.end_angle;
            }
        }
    }

    #[test]
    fn sunburst_siblings_ordered_by_volume(
        leaves in prop::collection::vec((0u8..3, 0u8..3, 0u8..4), 1..30),
    ) {
        // coarse volumes so equal siblings are common
        let paths: Vec<String> = leaves
            .iter()
            .enumerate()
            .map(|(i, (a, b, _))| format!("L{a}/M{b}/leaf{i:02}"))
            .collect();
        let entries = leaves
            .iter()
            .zip(&paths)
            .map(|((_, _, v), path)| SunburstEntry {
                path: path.as_str(),
                volume: f64::from(*v) * 50.0,
                variance_percent: 10.0,
                source: None,
            });
        let mut tree = SunburstTree::build(entries);
        tree.layout(START_ANGLE, START_ANGLE + TAU);

        for node in tree.nodes() {
            let children: Vec<_> = node.children.iter().filter_map(|id| tree.node(*id)).collect();
            for pair in children.windows(2) {
                let (first, second) = (pair[0], pair[1]);
                prop_assert!(first.volume >= second.volume);
                prop_assert!(first.start_angle <= second.start_angle);
                // equal leaves keep insertion order
                if first.volume == second.volume && first.is_leaf() && second.is_leaf() {
                    prop_assert!(first.label < second.label);
                }
            }
        }
    }
}

#[test]
fn squarify_reference_weights() {
    let rects = squarify(&[4.0, 3.0, 2.0, 1.0], TreemapRect::new(0.0, 0.0, 100.0, 100.0));
    let areas: Vec<i32> = rects.iter().map(|r| r.area().round() as i32).collect();
    assert_eq!(areas, vec![4000, 3000, 2000, 1000]);
}

#[test]
fn squarify_degenerate_inputs() {
    let container = TreemapRect::new(0.0, 0.0, 100.0, 100.0);
    assert!(squarify(&[], container).is_empty());
    assert_eq!(squarify(&[0.0, 0.0], container), vec![container, container]);
}

#[test]
fn sunburst_weighted_variance_and_colors() {
    let aggregates = vec![
        aggregate("P/a", 100.0, 10.0, AbcClass::B, XyzClass::X),
        aggregate("P/b", 300.0, 30.0, AbcClass::A, XyzClass::Y),
    ];
    let tree = SunburstTree::from_aggregates(&aggregates);
    let parent = tree.find("P").expect("parent node");
    assert_eq!(parent.variance_percent(), 25.0);

    // leaf "a" holds the minimum, "b" the maximum
    assert_eq!(tree.find("P/a").map(|n| n.color), Some(plasma_color(0.0)));
    assert_eq!(tree.find("P/b").map(|n| n.color), Some(plasma_color(1.0)));
    assert_eq!(tree.find("P/b").and_then(|n| n.aggregate), Some(1));
    assert_eq!(parent.aggregate, None);
}

#[test]
fn colormap_endpoints() {
    assert_eq!(plasma_color(0.0), Color32::from_rgb(13, 8, 135));
    assert_eq!(plasma_color(1.0), Color32::from_rgb(240, 249, 33));
    assert_eq!(plasma_color(-3.0), plasma_color(0.0));
    assert_eq!(plasma_color(7.0), plasma_color(1.0));
}

#[test]
fn sunburst_hit_test_after_layout() {
    let aggregates = vec![aggregate("Apparel/Kids", 10.0, 5.0, AbcClass::A, XyzClass::X)];
    let tree = SunburstTree::from_aggregates(&aggregates);
    let geometry = RingGeometry::default();
    // full circle on both rings
    assert_eq!(tree.hit_test(&geometry, [100.0, 0.0]).map(|n| n.path.as_str()), Some("Apparel"));
    assert_eq!(
        tree.hit_test(&geometry, [0.0, 150.0]).map(|n| n.path.as_str()),
        Some("Apparel/Kids")
    );
}

#[test]
fn matrix_bands_follow_class_totals() {
    let aggregates = vec![
        aggregate("A/x", 600.0, 10.0, AbcClass::A, XyzClass::X),
        aggregate("B/y", 300.0, 30.0, AbcClass::B, XyzClass::Y),
        aggregate("C/z", 100.0, 50.0, AbcClass::C, XyzClass::Z),
    ];
    let style = MatrixStyle::default();
    let frame = TreemapRect::new(0.0, 0.0, 740.0, 590.0);
    let layout = matrix_layout(&aggregates, frame, &style);

    let area = layout.chart_area;
    assert_eq!(area, TreemapRect::new(56.0, 8.0, 674.0, 528.0));
    let heights: Vec<f32> = layout.rows.iter().map(|(_, h)| *h).collect();
    for (h, share) in heights.iter().zip([0.6f32, 0.3, 0.1]) {
        assert!((h - area.h * share).abs() < 1e-3);
    }
    let widths: f32 = layout.cols.iter().map(|(_, w)| w).sum();
    assert!((widths - area.w).abs() < 1e-3);

    let ax = layout.cell(AbcClass::A, XyzClass::X);
    assert_eq!(ax.items.len(), 1);
    assert_eq!(ax.items[0].rect, Some(ax.inner));
    assert!(layout.cell(AbcClass::A, XyzClass::Z).items.is_empty());
}

#[test]
fn matrix_zero_volume_stays_finite() {
    let aggregates = vec![
        aggregate("A/x", 0.0, 10.0, AbcClass::C, XyzClass::X),
        aggregate("A/y", 0.0, 10.0, AbcClass::C, XyzClass::X),
    ];
    let frame = TreemapRect::new(0.0, 0.0, 740.0, 590.0);
    let layout = matrix_layout(&aggregates, frame, &MatrixStyle::default());
    assert_eq!(layout.placed_items().count(), 0);
    assert!(layout.rows.iter().all(|(y, h)| y.is_finite() && h.is_finite()));
    assert!(layout.cols.iter().all(|(x, w)| x.is_finite() && w.is_finite()));
}

#[test]
fn matrix_zero_volume_cell_is_not_hit_testable() {
    let aggregates = vec![
        aggregate("A/x", 100.0, 10.0, AbcClass::A, XyzClass::X),
        aggregate("C/y", 100.0, 30.0, AbcClass::C, XyzClass::Y),
        aggregate("C/x1", 0.0, 10.0, AbcClass::C, XyzClass::X),
        aggregate("C/x2", 0.0, 10.0, AbcClass::C, XyzClass::X),
    ];
    let frame = TreemapRect::new(0.0, 0.0, 740.0, 590.0);
    let layout = matrix_layout(&aggregates, frame, &MatrixStyle::default());

    let cx = layout.cell(AbcClass::C, XyzClass::X);
    assert_eq!(cx.items.len(), 2);
    assert!(cx.items.iter().all(|item| item.rect.is_none()));

    let placed: Vec<usize> = layout.placed_items().map(|(_, index, _)| index).collect();
    assert_eq!(placed, vec![0, 1]);

    let index = SpatialIndex::from_layout(&layout);
    assert_eq!(index.len(), 2);
    assert!(index.hit_test(cx.inner.center()).is_none());
    let ax = layout.cell(AbcClass::A, XyzClass::X);
    assert_eq!(index.hit_test(ax.inner.center()).map(|b| b.index), Some(0));
}
