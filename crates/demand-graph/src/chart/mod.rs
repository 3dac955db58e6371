//! egui chart widgets
//!
//! Each widget owns its cached layout and interaction state, paints through
//! `egui::Painter` and returns a [`ChartAction`](crate::interaction::ChartAction)
//! per frame.

pub mod abc_xyz;
pub mod series;
pub mod sunburst;

pub use abc_xyz::AbcXyzChart;
pub use series::SeriesChart;
pub use sunburst::SunburstChart;

use egui::epaint::TextShape;
use egui::emath::Rot2;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

use crate::colors::Palette;
use crate::tooltip::{TooltipContent, TooltipPlacement};

// =============================================================================
// SHARED PAINT HELPERS
// =============================================================================

const TOOLTIP_PADDING: f32 = 8.0;

/// Draw a tooltip box with its top-left corner at `origin`
pub(crate) fn paint_tooltip(
    painter: &Painter,
    origin: Pos2,
    placement: &TooltipPlacement,
    content: &TooltipContent,
    palette: &Palette,
) {
    let rect = Rect::from_min_size(origin, placement.size);
    painter.rect(
        rect,
        5.0,
        palette.tooltip_fill,
        Stroke::new(0.8, palette.tooltip_stroke),
    );

    let x = rect.min.x + TOOLTIP_PADDING;
    // Baselines relative to the box top
    let (lines, mut baseline): (Vec<(&str, f32, Color32)>, f32) = if content.has_breadcrumb() {
        (
            vec![
                (content.breadcrumb.as_str(), 9.0, palette.tooltip_breadcrumb),
                (content.title.as_str(), 12.0, palette.tooltip_title),
                (content.metric.as_str(), 10.0, palette.tooltip_body),
                (content.detail.as_str(), 10.0, palette.tooltip_muted),
            ],
            14.0,
        )
    } else {
        (
            vec![
                (content.title.as_str(), 12.0, palette.tooltip_title),
                (content.metric.as_str(), 10.0, palette.tooltip_body),
                (content.detail.as_str(), 10.0, palette.tooltip_muted),
            ],
            20.0,
        )
    };

    for (text, size, color) in lines {
        painter.text(
            Pos2::new(x, rect.min.y + baseline),
            Align2::LEFT_BOTTOM,
            text,
            FontId::proportional(size),
            color,
        );
        baseline += 16.0;
    }
}

/// Text centered on `anchor`, rotated by `angle` radians about that point
pub(crate) fn paint_rotated_text(
    painter: &Painter,
    anchor: Pos2,
    angle: f32,
    text: &str,
    font: FontId,
    color: Color32,
) {
    let galley = painter.layout_no_wrap(text.to_string(), font, color);
    // TextShape rotates around its top-left corner
    let half = galley.size() / 2.0;
    let pos = anchor - Rot2::from_angle(angle) * half;
    painter.add(TextShape::new(pos, galley, color).with_angle(angle));
}
