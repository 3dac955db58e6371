//! Label visibility and truncation
//!
//! Labels are drawn only when their on-screen extent is large enough;
//! text that would overflow is cut and ends in an ellipsis.

use serde::{Deserialize, Serialize};

use crate::treemap::TreemapRect;

pub const ELLIPSIS: char = '…';

/// Cut `text` to at most `max_chars` characters, ending in `…` when cut
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}

/// A label that passed the visibility check
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub text: String,
    pub font_size: f32,
}

// =============================================================================
// TREEMAP
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapLabelPolicy {
    pub max_font: f32,
    pub min_font: f32,
    pub min_width: f32,
    pub min_height: f32,
    pub max_chars: usize,
    /// Minimum cell size for the "AX" class label
    pub cell_min_width: f32,
    pub cell_min_height: f32,
}

impl Default for TreemapLabelPolicy {
    fn default() -> Self {
        Self {
            max_font: 10.0,
            min_font: 5.0,
            min_width: 28.0,
            min_height: 12.0,
            max_chars: 13,
            cell_min_width: 22.0,
            cell_min_height: 14.0,
        }
    }
}

impl TreemapLabelPolicy {
    /// Font scales with the box: min(max_font, h / 2.4, w / 4)
    pub fn sub_box_label(&self, rect: &TreemapRect, text: &str) -> Option<PlacedLabel> {
        let font_size = self.max_font.min(rect.h / 2.4).min(rect.w / 4.0);
        let visible =
            rect.w >= self.min_width && rect.h >= self.min_height && font_size >= self.min_font;
        visible.then(|| PlacedLabel {
            text: truncate_label(text, self.max_chars),
            font_size,
        })
    }

    pub fn cell_label_visible(&self, rect: &TreemapRect) -> bool {
        rect.w > self.cell_min_width && rect.h > self.cell_min_height
    }
}

// =============================================================================
// SUNBURST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunburstLabelPolicy {
    /// Base font per ring, level 1 first
    pub base_font: [f32; 4],
    pub min_font: f32,
    /// Arc length at mid radius below which no label is drawn
    pub min_arc: f32,
    /// Average glyph width as a fraction of font size
    pub glyph_width: f32,
}

impl Default for SunburstLabelPolicy {
    fn default() -> Self {
        Self {
            base_font: [13.0, 11.0, 9.0, 8.0],
            min_font: 5.0,
            min_arc: 14.0,
            glyph_width: 0.62,
        }
    }
}

impl SunburstLabelPolicy {
    /// Label for a ring segment of `arc_len` (at mid radius); radial text
    /// fits `ring_width`
    pub fn arc_label(
        &self,
        level: usize,
        arc_len: f32,
        ring_width: f32,
        text: &str,
    ) -> Option<PlacedLabel> {
        let base = self
            .base_font
            .get(level.saturating_sub(1))
            .copied()
            .unwrap_or(self.base_font[3]);
        let font_size = base.min(arc_len / 5.0);
        if arc_len <= self.min_arc || font_size < self.min_font {
            return None;
        }
        let max_chars = ((ring_width / (font_size * self.glyph_width)).floor() as usize).max(2);
        Some(PlacedLabel {
            text: truncate_label(text, max_chars),
            font_size,
        })
    }
}

/// Rotation (radians) for radial text at `mid_angle`, flipped on the left
/// half so it never reads upside down
pub fn radial_rotation(mid_angle: f32) -> f32 {
    if mid_angle.cos() < 0.0 {
        mid_angle + std::f32::consts::PI
    } else {
        mid_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_label("Compression", 13), "Compression");
        assert_eq!(truncate_label("SKU-0001-Premium", 13), "SKU-0001-Pre…");
        assert_eq!(truncate_label("Women's Running", 5), "Wome…");
        assert_eq!(truncate_label("é€ü", 2), "é…");
    }

    #[test]
    fn test_treemap_label_thresholds() {
        let policy = TreemapLabelPolicy::default();
        let big = TreemapRect::new(0.0, 0.0, 80.0, 30.0);
        let label = policy.sub_box_label(&big, "T-Shirts").unwrap();
        assert_eq!(label.font_size, 10.0);

        // too narrow
        assert!(policy.sub_box_label(&TreemapRect::new(0.0, 0.0, 27.0, 30.0), "x").is_none());
        // width-bound font: 30 / 4
        let square = TreemapRect::new(0.0, 0.0, 30.0, 30.0);
        assert_eq!(policy.sub_box_label(&square, "x").unwrap().font_size, 7.5);
        // 11 / 2.4 < 5
        assert!(policy.sub_box_label(&TreemapRect::new(0.0, 0.0, 80.0, 11.0), "x").is_none());

        assert!(policy.cell_label_visible(&TreemapRect::new(0.0, 0.0, 23.0, 15.0)));
        assert!(!policy.cell_label_visible(&TreemapRect::new(0.0, 0.0, 22.0, 15.0)));
    }

    #[test]
    fn test_arc_label() {
        let policy = SunburstLabelPolicy::default();
        assert!(policy.arc_label(1, 14.0, 66.0, "Apparel").is_none());

        let label = policy.arc_label(1, 200.0, 66.0, "Apparel").unwrap();
        assert_eq!(label.font_size, 13.0);
        // floor(66 / (13 * 0.62)) = 8 chars
        assert_eq!(label.text, "Apparel");

        let label = policy.arc_label(4, 30.0, 66.0, "SKU-0001-Premium").unwrap();
        // font min(8, 6) = 6 -> floor(66 / 3.72) = 17 chars
        assert_eq!(label.font_size, 6.0);
        assert_eq!(label.text, "SKU-0001-Premium");
    }

    #[test]
    fn test_radial_rotation_flips_left_half() {
        let right = radial_rotation(0.3);
        assert!((right - 0.3).abs() < 1e-6);
        let left = radial_rotation(std::f32::consts::PI);
        assert!((left - 2.0 * std::f32::consts::PI).abs() < 1e-6);
    }
}
