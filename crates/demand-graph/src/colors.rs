//! Color palettes for the demand charts
//!
//! Continuous plasma colormap for variance, a fixed 3×3 categorical palette
//! for ABC×XYZ cells and the badge/chrome colors shared by the widgets.
//! Everything is static data; renderers receive a [`Palette`] value.

use demand_types::{AbcClass, XyzClass};
use egui::Color32;

// =============================================================================
// PLASMA COLORMAP
// =============================================================================

/// matplotlib plasma, dark purple → yellow
pub const PLASMA_STOPS: [[u8; 3]; 10] = [
    [13, 8, 135],
    [70, 3, 159],
    [114, 1, 168],
    [156, 23, 158],
    [189, 55, 134],
    [216, 87, 107],
    [237, 121, 83],
    [251, 159, 58],
    [253, 202, 38],
    [240, 249, 33],
];

/// Map `t` in [0, 1] through the plasma stops (clamped, piecewise linear)
pub fn plasma_color(t: f32) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let n = PLASMA_STOPS.len() - 1;
    let scaled = t * n as f32;
    let i = (scaled.floor() as usize).min(n - 1);
    let f = scaled - i as f32;

    let lo = PLASMA_STOPS[i];
    let hi = PLASMA_STOPS[i + 1];
    let channel = |c: usize| {
        let v = lo[c] as f32 + f * (hi[c] as f32 - lo[c] as f32);
        v as u8 // truncates toward zero
    };
    Color32::from_rgb(channel(0), channel(1), channel(2))
}

// =============================================================================
// ABC × XYZ CELLS
// =============================================================================

/// Cell fill, rows A/B/C, columns X/Y/Z
pub const CELL_COLORS: [[Color32; 3]; 3] = [
    [
        Color32::from_rgb(0x1d, 0x4e, 0xd8), // AX blue
        Color32::from_rgb(0x6d, 0x28, 0xd9), // AY violet
        Color32::from_rgb(0xbe, 0x18, 0x5d), // AZ pink
    ],
    [
        Color32::from_rgb(0x04, 0x78, 0x57), // BX emerald
        Color32::from_rgb(0x03, 0x69, 0xa1), // BY sky
        Color32::from_rgb(0x4d, 0x7c, 0x0f), // BZ lime
    ],
    [
        Color32::from_rgb(0xb9, 0x1c, 0x1c), // CX red
        Color32::from_rgb(0xb4, 0x53, 0x09), // CY amber
        Color32::from_rgb(0xc2, 0x41, 0x0c), // CZ orange
    ],
];

/// Cell label foreground, same layout as [`CELL_COLORS`]
pub const LABEL_FG: [[Color32; 3]; 3] = [
    [
        Color32::from_rgb(0xbf, 0xdb, 0xfe),
        Color32::from_rgb(0xdd, 0xd6, 0xfe),
        Color32::from_rgb(0xfc, 0xe7, 0xf3),
    ],
    [
        Color32::from_rgb(0xa7, 0xf3, 0xd0),
        Color32::from_rgb(0xba, 0xe6, 0xfd),
        Color32::from_rgb(0xec, 0xfc, 0xcb),
    ],
    [
        Color32::from_rgb(0xfe, 0xca, 0xca),
        Color32::from_rgb(0xfd, 0xe6, 0x8a),
        Color32::from_rgb(0xfe, 0xd7, 0xaa),
    ],
];

pub fn cell_color(abc: AbcClass, xyz: XyzClass) -> Color32 {
    CELL_COLORS[abc.index()][xyz.index()]
}

pub fn label_fg(abc: AbcClass, xyz: XyzClass) -> Color32 {
    LABEL_FG[abc.index()][xyz.index()]
}

// =============================================================================
// BADGES
// =============================================================================

/// (background, text) for the ABC badge in the master table
pub fn abc_badge_colors(abc: AbcClass) -> (Color32, Color32) {
    match abc {
        AbcClass::A => (
            Color32::from_rgb(219, 234, 254), // blue-100
            Color32::from_rgb(29, 78, 216),   // blue-700
        ),
        AbcClass::B => (
            Color32::from_rgb(220, 252, 231), // green-100
            Color32::from_rgb(21, 128, 61),   // green-700
        ),
        AbcClass::C => (
            Color32::from_rgb(243, 244, 246), // gray-100
            Color32::from_rgb(55, 65, 81),    // gray-700
        ),
    }
}

/// (background, text) for the XYZ badge in the master table
pub fn xyz_badge_colors(xyz: XyzClass) -> (Color32, Color32) {
    match xyz {
        XyzClass::X => (
            Color32::from_rgb(243, 244, 246), // gray-100
            Color32::from_rgb(55, 65, 81),    // gray-700
        ),
        XyzClass::Y => (
            Color32::from_rgb(254, 243, 199), // amber-100
            Color32::from_rgb(180, 83, 9),    // amber-700
        ),
        XyzClass::Z => (
            Color32::from_rgb(254, 226, 226), // red-100
            Color32::from_rgb(185, 28, 28),   // red-700
        ),
    }
}

// =============================================================================
// PALETTE
// =============================================================================

/// Colors injected into the chart renderers
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub cells: [[Color32; 3]; 3],
    pub cell_labels: [[Color32; 3]; 3],
    pub matrix_background: Color32,
    pub grid_line: Color32,
    pub axis_label: Color32,
    pub axis_title: Color32,
    pub axis_hint: Color32,
    pub sunburst_background: Color32,
    pub sunburst_hub: Color32,
    pub tooltip_fill: Color32,
    pub tooltip_stroke: Color32,
    pub tooltip_breadcrumb: Color32,
    pub tooltip_title: Color32,
    pub tooltip_body: Color32,
    pub tooltip_muted: Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            cells: CELL_COLORS,
            cell_labels: LABEL_FG,
            matrix_background: Color32::WHITE,
            grid_line: Color32::WHITE,
            axis_label: Color32::from_rgb(55, 65, 81),    // #374151
            axis_title: Color32::from_rgb(107, 114, 128), // #6b7280
            axis_hint: Color32::from_rgb(156, 163, 175),  // #9ca3af
            sunburst_background: Color32::from_rgb(11, 11, 11), // #0b0b0b
            sunburst_hub: Color32::from_rgb(23, 17, 46),        // #17112e
            tooltip_fill: Color32::from_rgba_unmultiplied(10, 10, 22, 235),
            tooltip_stroke: Color32::from_rgba_unmultiplied(255, 255, 255, 51),
            tooltip_breadcrumb: Color32::from_rgb(100, 116, 139), // #64748b
            tooltip_title: Color32::WHITE,
            tooltip_body: Color32::from_rgb(226, 232, 240), // #e2e8f0
            tooltip_muted: Color32::from_rgb(148, 163, 184), // #94a3b8
        }
    }
}

impl Palette {
    pub fn cell(&self, abc: AbcClass, xyz: XyzClass) -> Color32 {
        self.cells[abc.index()][xyz.index()]
    }

    pub fn cell_label(&self, abc: AbcClass, xyz: XyzClass) -> Color32 {
        self.cell_labels[abc.index()][xyz.index()]
    }
}
