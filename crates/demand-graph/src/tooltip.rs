//! Tooltip content and placement

use demand_types::{ComputedAggregate, VolumeType};
use egui::{Pos2, Vec2};

use crate::format::{format_metric, format_variance};
use crate::labels::truncate_label;
use crate::sunburst::SunburstNode;

/// Four text lines; an empty breadcrumb is skipped when drawn
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub breadcrumb: String,
    pub title: String,
    pub metric: String,
    pub detail: String,
}

impl TooltipContent {
    pub fn for_aggregate(aggregate: &ComputedAggregate, volume_type: VolumeType) -> Self {
        Self {
            breadcrumb: aggregate.breadcrumb(),
            title: truncate_label(aggregate.display_name(), 25),
            metric: format_metric(aggregate.volume_total, volume_type),
            detail: format!(
                "{} · Variance: {}",
                aggregate.class_key(),
                format_variance(aggregate.variance_percent)
            ),
        }
    }

    pub fn for_node(node: &SunburstNode, volume_type: VolumeType) -> Self {
        Self {
            breadcrumb: node.breadcrumb(),
            title: node.label.clone(),
            metric: format_metric(node.volume, volume_type),
            detail: format!("Variance: {}", format_variance(node.variance_percent())),
        }
    }

    pub fn has_breadcrumb(&self) -> bool {
        !self.breadcrumb.is_empty()
    }
}

/// Tooltip box size and how it sits next to the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    pub size: Vec2,
    /// Horizontal gap right of the pointer
    pub offset: f32,
    /// Minimum distance to the frame edges
    pub margin: Vec2,
}

impl TooltipPlacement {
    /// 230×76 box, 12 px right of the pointer
    pub fn matrix() -> Self {
        Self {
            size: Vec2::new(230.0, 76.0),
            offset: 12.0,
            margin: Vec2::new(6.0, 4.0),
        }
    }

    /// 220 wide; taller when a breadcrumb line is shown
    pub fn sunburst(with_breadcrumb: bool) -> Self {
        Self {
            size: Vec2::new(220.0, if with_breadcrumb { 80.0 } else { 64.0 }),
            offset: 14.0,
            margin: Vec2::new(8.0, 8.0),
        }
    }

    /// Top-left corner for a pointer at `pointer` (frame-relative), kept
    /// inside a frame of `frame_size`
    pub fn place(&self, pointer: Pos2, frame_size: Vec2) -> Pos2 {
        let max_x = frame_size.x - self.size.x - self.margin.x;
        let max_y = frame_size.y - self.size.y - self.margin.y;
        let x = (pointer.x + self.offset).min(max_x).max(self.margin.x);
        let y = (pointer.y - self.size.y / 2.0).min(max_y).max(self.margin.y);
        Pos2::new(x, y)
    }
}
