//! Hierarchy sunburst widget
//!
//! Segments are tessellated into triangle strips (`egui::Mesh`); labels are
//! rotated text shapes. Geometry is defined on an 800×740 reference frame
//! and scaled uniformly to the allocated width.

use demand_types::{ComputedAggregate, VolumeType};
use egui::{Align2, Color32, CursorIcon, FontId, Mesh, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use super::{paint_rotated_text, paint_tooltip};
use crate::colors::{plasma_color, Palette};
use crate::format::format_variance;
use crate::interaction::{ChartAction, ChartItem, HoverEvent, InteractionState, Selection};
use crate::labels::{radial_rotation, SunburstLabelPolicy};
use crate::sunburst::{legend_ticks, RingGeometry, SunburstNode, SunburstTree};
use crate::tooltip::{TooltipContent, TooltipPlacement};

const REFERENCE_SIZE: Vec2 = Vec2::new(800.0, 740.0);
const CENTER: Vec2 = Vec2::new(315.0, 390.0);
const MIN_WIDTH: f32 = 320.0;

/// Gradient legend bar
const LEGEND_X: f32 = 700.0;
const LEGEND_TOP: f32 = 80.0;
const LEGEND_BOTTOM: f32 = 650.0;
const LEGEND_WIDTH: f32 = 18.0;

const HOVER_OPACITY: f32 = 0.72;

pub const TITLE: &str = "ABC-XYZ Classified Time Series: Hierarchical Volume Distribution";

pub struct SunburstChart {
    pub geometry: RingGeometry,
    pub labels: SunburstLabelPolicy,
    pub palette: Palette,
    state: InteractionState,
    tree: Option<SunburstTree>,
}

impl Default for SunburstChart {
    fn default() -> Self {
        Self::new(RingGeometry::default(), SunburstLabelPolicy::default(), Palette::default())
    }
}

impl SunburstChart {
    pub fn new(geometry: RingGeometry, labels: SunburstLabelPolicy, palette: Palette) -> Self {
        Self {
            geometry,
            labels,
            palette,
            state: InteractionState::default(),
            tree: None,
        }
    }

    /// Drop the cached tree; the next frame rebuilds it
    pub fn invalidate(&mut self) {
        self.tree = None;
        self.state.clear();
    }

    pub fn tree(&self) -> Option<&SunburstTree> {
        self.tree.as_ref()
    }

    pub fn legend_visible(&self) -> bool {
        self.state.legend_visible
    }

    /// Paint header, rings, hub, legend and tooltip
    pub fn show(
        &mut self,
        ui: &mut Ui,
        aggregates: &[ComputedAggregate],
        volume_type: VolumeType,
    ) -> ChartAction {
        let mut action = ChartAction::default();

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(TITLE).size(13.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let text = if self.state.legend_visible {
                    "⏶ Hide legend"
                } else {
                    "⏷ Show legend"
                };
                if ui.small_button(text).clicked() {
                    self.state.toggle_legend();
                    action.legend_toggled = true;
                }
            });
        });

        let tree = self.tree.get_or_insert_with(|| {
            let tree = SunburstTree::from_aggregates(aggregates);
            tracing::debug!(nodes = tree.len(), "sunburst tree rebuilt");
            tree
        });

        let width = ui.available_width().max(MIN_WIDTH);
        let scale = width / REFERENCE_SIZE.x;
        let (rect, response) = ui.allocate_exact_size(REFERENCE_SIZE * scale, Sense::click());
        let center = rect.min + CENTER * scale;
        let geometry = RingGeometry {
            inner_radius: self.geometry.inner_radius * scale,
            ring_width: self.geometry.ring_width * scale,
            padding: self.geometry.padding,
        };

        // Hover and click
        let pointer = response.hover_pos();
        let hit = pointer.and_then(|p| tree.hit_test(&geometry, [p.x - center.x, p.y - center.y]));
        self.state.set_hover(
            hit.map(|n| ChartItem::Node(n.id)),
            pointer.map(|p| p - rect.min.to_vec2()),
        );
        if let (Some(node), Some(pos)) = (hit, pointer) {
            let selection = Selection::from_node(node, aggregates);
            if response.clicked() {
                tracing::debug!(path = %selection.hierarchy_path, "sunburst selection");
                action.selected = Some(selection.clone());
            }
            action.hovered = Some(HoverEvent {
                item: ChartItem::Node(node.id),
                selection,
                pointer: pos,
            });
            response.clone().on_hover_cursor(CursorIcon::PointingHand);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.palette.sunburst_background);

        for node in tree.visible_nodes() {
            let hovered = self.state.is_hovered(ChartItem::Node(node.id));
            paint_segment(
                &painter,
                &geometry,
                center,
                node,
                hovered,
                self.palette.sunburst_background,
            );

            let arc_len = self.geometry.arc_len(node);
            let label =
                self.labels
                    .arc_label(node.level, arc_len, self.geometry.ring_width, &node.label);
            if let Some(label) = label {
                paint_rotated_text(
                    &painter,
                    geometry.label_anchor(center, node),
                    radial_rotation(node.mid_angle()),
                    &label.text,
                    FontId::proportional(label.font_size * scale),
                    Color32::WHITE,
                );
            }
        }

        painter.circle_filled(
            center,
            (self.geometry.inner_radius - 1.0).max(0.0) * scale,
            self.palette.sunburst_hub,
        );

        if self.state.legend_visible {
            let (min, max) = tree.variance_range();
            paint_legend(&painter, rect.min, scale, min, max, &self.palette);
        }

        if let (Some(ChartItem::Node(id)), Some(local)) = (self.state.hovered, self.state.pointer) {
            if let Some(node) = tree.node(id) {
                let content = TooltipContent::for_node(node, volume_type);
                let placement = TooltipPlacement::sunburst(content.has_breadcrumb());
                let origin = placement.place(local, rect.size()) + rect.min.to_vec2();
                paint_tooltip(&painter, origin, &placement, &content, &self.palette);
            }
        }

        action
    }
}

/// Fill one ring segment as a triangle strip, plus a hairline on its
/// leading edge
fn paint_segment(
    painter: &egui::Painter,
    geometry: &RingGeometry,
    center: Pos2,
    node: &SunburstNode,
    hovered: bool,
    background: Color32,
) {
    let strip = geometry.arc_strip(center, node);
    if strip.len() < 2 {
        return;
    }
    let color = if hovered {
        node.color.gamma_multiply(HOVER_OPACITY)
    } else {
        node.color
    };

    let mut mesh = Mesh::default();
    for (inner, outer) in &strip {
        mesh.colored_vertex(*inner, color);
        mesh.colored_vertex(*outer, color);
    }
    for i in 0..(strip.len() as u32 - 1) {
        let k = i * 2;
        mesh.add_triangle(k, k + 1, k + 2);
        mesh.add_triangle(k + 1, k + 3, k + 2);
    }
    painter.add(Shape::mesh(mesh));

    let (inner, outer) = strip[0];
    painter.line_segment([inner, outer], Stroke::new(0.6, background));
}

/// Vertical plasma bar, high variance on top, with five ticks
fn paint_legend(
    painter: &egui::Painter,
    origin: Pos2,
    scale: f32,
    min: f64,
    max: f64,
    palette: &Palette,
) {
    let at = |x: f32, y: f32| origin + Vec2::new(x, y) * scale;
    let height = LEGEND_BOTTOM - LEGEND_TOP;

    let mut mesh = Mesh::default();
    let steps = 10u32;
    for i in 0..=steps {
        let f = i as f32 / steps as f32;
        let color = plasma_color(1.0 - f);
        let y = LEGEND_TOP + f * height;
        mesh.colored_vertex(at(LEGEND_X, y), color);
        mesh.colored_vertex(at(LEGEND_X + LEGEND_WIDTH, y), color);
    }
    for i in 0..steps {
        let k = i * 2;
        mesh.add_triangle(k, k + 1, k + 2);
        mesh.add_triangle(k + 1, k + 3, k + 2);
    }
    painter.add(Shape::mesh(mesh));

    painter.text(
        at(LEGEND_X + LEGEND_WIDTH / 2.0, LEGEND_TOP - 14.0),
        Align2::CENTER_BOTTOM,
        "variance %",
        FontId::proportional(11.0),
        palette.tooltip_muted,
    );

    let tick = Stroke::new(1.0, palette.tooltip_breadcrumb);
    for (t, value) in legend_ticks(min, max) {
        let y = LEGEND_TOP + (1.0 - t) * height;
        painter.line_segment(
            [at(LEGEND_X + LEGEND_WIDTH, y), at(LEGEND_X + LEGEND_WIDTH + 5.0, y)],
            tick,
        );
        painter.text(
            at(LEGEND_X + LEGEND_WIDTH + 8.0, y),
            Align2::LEFT_CENTER,
            format_variance(value),
            FontId::proportional(9.0),
            palette.tooltip_muted,
        );
    }
}
