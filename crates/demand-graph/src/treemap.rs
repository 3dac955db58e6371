//! Squarified treemap and the ABC-XYZ matrix layout
//!
//! ```text
//!  frame ─ margins ─► chart area
//!                        │ row heights ∝ A/B/C totals
//!                        │ col widths  ∝ X/Y/Z totals
//!                        ▼
//!   ┌────────┬──────┬───┐
//!   │ AX     │ AY   │AZ │   each cell: label band on top,
//!   │ ▓▓▓░░  │ ▓▓░  │▓  │   members squarified into the
//!   ├────────┼──────┼───┤   remaining inner rect
//!   │ BX     │ BY   │BZ │
//!   ├────────┼──────┼───┤
//!   │ CX     │ CY   │CZ │
//!   └────────┴──────┴───┘
//! ```
//!
//! All functions are pure. Degenerate inputs (zero totals, zero-area
//! containers) produce finite geometry, never NaN.

use demand_types::{AbcClass, ComputedAggregate, XyzClass};
use serde::{Deserialize, Serialize};

// =============================================================================
// RECT
// =============================================================================

/// Axis-aligned rectangle in chart coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TreemapRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl TreemapRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.w / 2.0, self.y + self.h / 2.0]
    }

    pub fn min(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn max(&self) -> [f32; 2] {
        [self.x + self.w, self.y + self.h]
    }

    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.x
            && point[0] <= self.x + self.w
            && point[1] >= self.y
            && point[1] <= self.y + self.h
    }

    /// Shrink by `margin` on every side (never below zero size)
    pub fn shrink(&self, margin: f32) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            w: (self.w - 2.0 * margin).max(0.0),
            h: (self.h - 2.0 * margin).max(0.0),
        }
    }

    pub fn to_egui(&self) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(self.x, self.y), egui::vec2(self.w, self.h))
    }

    pub fn from_egui(rect: egui::Rect) -> Self {
        Self::new(rect.min.x, rect.min.y, rect.width(), rect.height())
    }

    /// Same rectangle moved by `offset`
    pub fn translate(&self, offset: egui::Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}

// =============================================================================
// SQUARIFY
// =============================================================================

/// Worst aspect ratio of a row laid along a side of length `side`
fn worst_ratio(sum: f64, min: f64, max: f64, side: f64) -> f64 {
    if sum <= 0.0 || min <= 0.0 {
        return f64::INFINITY;
    }
    let s2 = side * side;
    let sum2 = sum * sum;
    (s2 * max / sum2).max(sum2 / (s2 * min))
}

/// Partition `container` among `weights`, one rectangle per weight in input
/// order.
///
/// - empty weights → empty result
/// - all-zero weights or a zero-area container → copies of the container
/// - otherwise the rectangles tile the container and each area is
///   proportional to its weight share
pub fn squarify(weights: &[f64], container: TreemapRect) -> Vec<TreemapRect> {
    if weights.is_empty() {
        return Vec::new();
    }
    let clean: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();
    if total <= 0.0 || container.w <= 0.0 || container.h <= 0.0 {
        return vec![container; weights.len()];
    }

    let area = container.w as f64 * container.h as f64;
    let normalized: Vec<f64> = clean.iter().map(|w| w / total * area).collect();

    // Stable descending order; output is mapped back to input positions
    let mut order: Vec<usize> = (0..normalized.len()).collect();
    order.sort_by(|a, b| normalized[*b].total_cmp(&normalized[*a]));
    let sorted: Vec<f64> = order.iter().map(|i| normalized[*i]).collect();

    let laid = strip(&sorted, container);
    let mut result = vec![container; weights.len()];
    for (rank, original) in order.into_iter().enumerate() {
        result[original] = laid[rank];
    }
    result
}

/// Lay out descending `items` (already scaled to area) row by row
fn strip(items: &[f64], container: TreemapRect) -> Vec<TreemapRect> {
    let mut out = Vec::with_capacity(items.len());
    let (mut x, mut y) = (container.x as f64, container.y as f64);
    let (mut w, mut h) = (container.w as f64, container.h as f64);
    let mut rest = items;

    while !rest.is_empty() {
        let rect = TreemapRect::new(x as f32, y as f32, w.max(0.0) as f32, h.max(0.0) as f32);
        if rest.len() == 1 {
            out.push(rect);
            break;
        }

        let wide = w >= h;
        let side = if wide { h } else { w };
        if side <= 0.0 {
            // sliver left over from rounding
            out.extend(std::iter::repeat(rect).take(rest.len()));
            break;
        }

        // Grow the row while the worst ratio does not get worse
        let mut row_end = 1;
        let (mut sum, mut min, mut max) = (rest[0], rest[0], rest[0]);
        for &item in &rest[1..] {
            let cand_sum = sum + item;
            let cand_min = min.min(item);
            let cand_max = max.max(item);
            if worst_ratio(cand_sum, cand_min, cand_max, side) > worst_ratio(sum, min, max, side) {
                break;
            }
            sum = cand_sum;
            min = cand_min;
            max = cand_max;
            row_end += 1;
        }

        let thick = sum / side;
        let mut offset = 0.0;
        for &item in &rest[..row_end] {
            let len = if sum > 0.0 { item / sum * side } else { 0.0 };
            let r = if wide {
                TreemapRect::new(x as f32, (y + offset) as f32, thick as f32, len as f32)
            } else {
                TreemapRect::new((x + offset) as f32, y as f32, len as f32, thick as f32)
            };
            out.push(r);
            offset += len;
        }

        if wide {
            x += thick;
            w -= thick;
        } else {
            y += thick;
            h -= thick;
        }
        rest = &rest[row_end..];
    }
    out
}

// =============================================================================
// ABC-XYZ MATRIX
// =============================================================================

/// Margins and spacing of the ABC-XYZ matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixStyle {
    /// Room for row labels and the vertical axis title
    pub margin_left: f32,
    /// Room for column labels, band hints and the horizontal axis title
    pub margin_bottom: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    /// Gutter between a cell edge and its sub-boxes
    pub gutter: f32,
    /// Height reserved at the top of each cell for its class label
    pub label_band: f32,
}

impl Default for MatrixStyle {
    fn default() -> Self {
        Self {
            margin_left: 56.0,
            margin_bottom: 54.0,
            margin_top: 8.0,
            margin_right: 10.0,
            gutter: 1.5,
            label_band: 16.0,
        }
    }
}

/// One member of a cell; `rect` is `None` when the cell is too small to
/// squarify into
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixItem {
    /// Index into the aggregate slice the layout was built from
    pub index: usize,
    pub rect: Option<TreemapRect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixCell {
    pub abc: AbcClass,
    pub xyz: XyzClass,
    pub rect: TreemapRect,
    pub inner: TreemapRect,
    pub volume: f64,
    pub items: Vec<MatrixItem>,
}

impl MatrixCell {
    pub fn key(&self) -> String {
        format!("{}{}", self.abc.as_str(), self.xyz.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixLayout {
    /// Row-major: AX, AY, AZ, BX, ..., CZ
    pub cells: [MatrixCell; 9],
    pub chart_area: TreemapRect,
    /// (y, height) per ABC row
    pub rows: [(f32, f32); 3],
    /// (x, width) per XYZ column
    pub cols: [(f32, f32); 3],
}

impl MatrixLayout {
    pub fn cell(&self, abc: AbcClass, xyz: XyzClass) -> &MatrixCell {
        &self.cells[abc.index() * 3 + xyz.index()]
    }

    /// Every member with a drawable rectangle
    pub fn placed_items(&self) -> impl Iterator<Item = (&MatrixCell, usize, TreemapRect)> {
        self.cells.iter().flat_map(|cell| {
            cell.items
                .iter()
                .filter_map(move |item| item.rect.map(|r| (cell, item.index, r)))
        })
    }
}

/// Split `length` into three bands proportional to `totals`; equal thirds
/// when the totals are all zero
fn bands(start: f32, length: f32, totals: [f64; 3]) -> [(f32, f32); 3] {
    let grand: f64 = totals.iter().sum();
    let sizes = if grand > 0.0 {
        totals.map(|t| (t / grand) as f32 * length)
    } else {
        [length / 3.0; 3]
    };
    let mut cursor = start;
    sizes.map(|size| {
        let band = (cursor, size);
        cursor += size;
        band
    })
}

/// Lay out aggregates as the 3×3 ABC-XYZ matrix inside `frame`
pub fn matrix_layout(
    aggregates: &[ComputedAggregate],
    frame: TreemapRect,
    style: &MatrixStyle,
) -> MatrixLayout {
    let chart_area = TreemapRect::new(
        frame.x + style.margin_left,
        frame.y + style.margin_top,
        (frame.w - style.margin_left - style.margin_right).max(0.0),
        (frame.h - style.margin_top - style.margin_bottom).max(0.0),
    );

    let mut members: [Vec<usize>; 9] = Default::default();
    let mut volumes = [[0.0f64; 3]; 3];
    for (idx, agg) in aggregates.iter().enumerate() {
        let (r, c) = (agg.abc_class.index(), agg.xyz_class.index());
        members[r * 3 + c].push(idx);
        volumes[r][c] += agg.volume_total.max(0.0);
    }

    let row_totals = [0, 1, 2].map(|r| volumes[r].iter().sum::<f64>());
    let col_totals = [0, 1, 2].map(|c| volumes.iter().map(|row| row[c]).sum::<f64>());
    let rows = bands(chart_area.y, chart_area.h, row_totals);
    let cols = bands(chart_area.x, chart_area.w, col_totals);

    let cells: [MatrixCell; 9] = std::array::from_fn(|i| {
        let (abc, xyz) = (AbcClass::ALL[i / 3], XyzClass::ALL[i % 3]);
        let (y, h) = rows[i / 3];
        let (x, w) = cols[i % 3];
        let rect = TreemapRect::new(x, y, w, h);
        let inner = TreemapRect::new(
            x + style.gutter,
            y + style.label_band,
            (w - style.gutter * 2.0).max(0.0),
            (h - style.label_band - style.gutter).max(0.0),
        );

        let indices = std::mem::take(&mut members[i]);
        let weights: Vec<f64> = indices
            .iter()
            .map(|j| aggregates[*j].volume_total.max(0.0))
            .collect();
        // An all-zero cell would squarify to stacked copies of `inner`
        let rects = if weights.iter().sum::<f64>() > 0.0 && inner.w > 1.0 && inner.h > 1.0 {
            squarify(&weights, inner)
        } else {
            Vec::new()
        };

        let items = indices
            .into_iter()
            .enumerate()
            .map(|(k, index)| MatrixItem {
                index,
                rect: rects.get(k).copied().filter(|_| weights[k] > 0.0),
            })
            .collect();

        MatrixCell {
            abc,
            xyz,
            rect,
            inner,
            volume: volumes[i / 3][i % 3],
            items,
        }
    });

    MatrixLayout {
        cells,
        chart_area,
        rows,
        cols,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use demand_types::element_id_for;
    use pretty_assertions::assert_eq;

    const EPS: f32 = 1e-3;

    fn container() -> TreemapRect {
        TreemapRect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn agg(path: &str, volume: f64, abc: AbcClass, xyz: XyzClass) -> ComputedAggregate {
        ComputedAggregate {
            element_id: element_id_for(path),
            hierarchy_path: path.to_string(),
            volume_total: volume,
            variance_percent: 10.0,
            abc_class: abc,
            xyz_class: xyz,
            aggregates: BTreeMap::new(),
        }
    }

    #[test]
    fn test_squarify_area_fidelity() {
        let rects = squarify(&[4.0, 3.0, 2.0, 1.0], container());
        let areas: Vec<f32> = rects.iter().map(|r| r.area()).collect();
        for (area, expected) in areas.iter().zip([4000.0, 3000.0, 2000.0, 1000.0]) {
            assert!((area - expected).abs() < 0.01, "{area} vs {expected}");
        }
    }

    #[test]
    fn test_squarify_degenerate() {
        assert!(squarify(&[], container()).is_empty());
        assert_eq!(squarify(&[0.0, 0.0], container()), vec![container(); 2]);

        let flat = TreemapRect::new(5.0, 5.0, 0.0, 40.0);
        assert_eq!(squarify(&[1.0, 2.0, 3.0], flat), vec![flat; 3]);
    }

    #[test]
    fn test_squarify_single_item_fills_container() {
        let c = TreemapRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(squarify(&[7.0], c), vec![c]);
    }

    #[test]
    fn test_squarify_keeps_input_order() {
        let rects = squarify(&[1.0, 9.0], container());
        assert!(rects[1].area() > rects[0].area());
        assert!((rects[0].area() - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_squarify_zero_weight_among_positive() {
        let rects = squarify(&[5.0, 0.0, 5.0], container());
        assert_eq!(rects.len(), 3);
        for r in &rects {
            assert!(r.x.is_finite() && r.y.is_finite() && r.w.is_finite() && r.h.is_finite());
        }
        assert!(rects[1].area().abs() < EPS);
    }

    #[test]
    fn test_matrix_bands_proportional() {
        let aggregates = vec![
            agg("a", 300.0, AbcClass::A, XyzClass::X),
            agg("b", 100.0, AbcClass::B, XyzClass::Y),
            agg("c", 100.0, AbcClass::C, XyzClass::Z),
        ];
        let frame = TreemapRect::new(0.0, 0.0, 740.0, 590.0);
        let layout = matrix_layout(&aggregates, frame, &MatrixStyle::default());

        assert_eq!(layout.chart_area, TreemapRect::new(56.0, 8.0, 674.0, 528.0));
        let (_, row_a) = layout.rows[0];
        assert!((row_a - 528.0 * 0.6).abs() < EPS);
        let (x_y, _) = layout.cols[1];
        assert!((x_y - (56.0 + 674.0 * 0.6)).abs() < EPS);

        let ax = layout.cell(AbcClass::A, XyzClass::X);
        assert_eq!(ax.key(), "AX");
        assert_eq!(ax.items.len(), 1);
        assert_eq!(ax.items[0].rect, Some(ax.inner));

        // empty cells keep their band but have no members
        let ay = layout.cell(AbcClass::A, XyzClass::Y);
        assert!(ay.items.is_empty());
        assert_eq!(layout.placed_items().count(), 3);
    }

    #[test]
    fn test_matrix_zero_volume_is_finite() {
        let aggregates = vec![agg("a", 0.0, AbcClass::C, XyzClass::X)];
        let layout = matrix_layout(
            &aggregates,
            TreemapRect::new(0.0, 0.0, 740.0, 590.0),
            &MatrixStyle::default(),
        );
        for cell in &layout.cells {
            assert!(cell.rect.w.is_finite() && cell.rect.h.is_finite());
        }
        let cx = layout.cell(AbcClass::C, XyzClass::X);
        assert_eq!(cx.items.len(), 1);
        assert_eq!(cx.items[0].rect, None);
        assert_eq!(layout.placed_items().count(), 0);
    }

    #[test]
    fn test_matrix_zero_volume_cell_beside_populated_cells() {
        let aggregates = vec![
            agg("ax", 100.0, AbcClass::A, XyzClass::X),
            agg("cy", 100.0, AbcClass::C, XyzClass::Y),
            agg("cx1", 0.0, AbcClass::C, XyzClass::X),
            agg("cx2", 0.0, AbcClass::C, XyzClass::X),
        ];
        let layout = matrix_layout(
            &aggregates,
            TreemapRect::new(0.0, 0.0, 740.0, 590.0),
            &MatrixStyle::default(),
        );
        let cx = layout.cell(AbcClass::C, XyzClass::X);
        assert!(cx.inner.area() > 1.0);
        let rects: Vec<Option<TreemapRect>> = cx.items.iter().map(|i| i.rect).collect();
        assert_eq!(rects, vec![None, None]);

        let placed: Vec<usize> = layout.placed_items().map(|(_, index, _)| index).collect();
        assert_eq!(placed, vec![0, 1]);
    }

    #[test]
    fn test_matrix_zero_member_beside_positive_member() {
        let aggregates = vec![
            agg("a", 50.0, AbcClass::B, XyzClass::Y),
            agg("b", 0.0, AbcClass::B, XyzClass::Y),
        ];
        let layout = matrix_layout(
            &aggregates,
            TreemapRect::new(0.0, 0.0, 740.0, 590.0),
            &MatrixStyle::default(),
        );
        let by = layout.cell(AbcClass::B, XyzClass::Y);
        assert_eq!(by.items[0].rect, Some(by.inner));
        assert_eq!(by.items[1].rect, None);
    }

    #[test]
    fn test_matrix_tiny_cell_has_no_rects() {
        let aggregates = vec![
            agg("big", 1_000_000.0, AbcClass::A, XyzClass::X),
            agg("tiny", 1.0, AbcClass::C, XyzClass::Z),
        ];
        let layout = matrix_layout(
            &aggregates,
            TreemapRect::new(0.0, 0.0, 740.0, 590.0),
            &MatrixStyle::default(),
        );
        let cz = layout.cell(AbcClass::C, XyzClass::Z);
        assert_eq!(cz.items.len(), 1);
        assert_eq!(cz.items[0].rect, None);
    }
}
