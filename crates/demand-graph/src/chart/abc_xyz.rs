//! ABC-XYZ matrix treemap widget
//!
//! Rows are ABC classes (A on top), columns XYZ classes. Row heights and
//! column widths follow the class volume totals; every cell squarifies its
//! members. The layout is rebuilt only when the aggregates change
//! ([`AbcXyzChart::invalidate`]) or the allocated size changes.

use demand_types::{AbcClass, ComputedAggregate, VolumeType, XyzClass};
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use std::f32::consts::FRAC_PI_2;

use super::{paint_rotated_text, paint_tooltip};
use crate::colors::Palette;
use crate::interaction::{ChartAction, ChartItem, HoverEvent, InteractionState, Selection};
use crate::labels::TreemapLabelPolicy;
use crate::spatial::SpatialIndex;
use crate::tooltip::{TooltipContent, TooltipPlacement};
use crate::treemap::{matrix_layout, MatrixLayout, MatrixStyle, TreemapRect};

/// Height / width of the chart frame
const ASPECT: f32 = 590.0 / 740.0;
const MIN_WIDTH: f32 = 320.0;

const SUB_BOX_OPACITY: f32 = 0.85;
const SUB_BOX_HOVER_OPACITY: f32 = 0.58;

/// Variance band under each XYZ column
fn band_hint(xyz: XyzClass) -> &'static str {
    match xyz {
        XyzClass::X => "≤20%",
        XyzClass::Y => "20–40%",
        XyzClass::Z => ">40%",
    }
}

pub struct AbcXyzChart {
    pub style: MatrixStyle,
    pub labels: TreemapLabelPolicy,
    pub palette: Palette,
    state: InteractionState,
    layout: Option<MatrixLayout>,
    index: SpatialIndex,
    laid_out_size: Vec2,
}

impl Default for AbcXyzChart {
    fn default() -> Self {
        Self::new(MatrixStyle::default(), TreemapLabelPolicy::default(), Palette::default())
    }
}

impl AbcXyzChart {
    pub fn new(style: MatrixStyle, labels: TreemapLabelPolicy, palette: Palette) -> Self {
        Self {
            style,
            labels,
            palette,
            state: InteractionState::default(),
            layout: None,
            index: SpatialIndex::new(),
            laid_out_size: Vec2::ZERO,
        }
    }

    /// Drop the cached layout; the next frame lays out again
    pub fn invalidate(&mut self) {
        self.layout = None;
        self.index = SpatialIndex::new();
        self.state.clear();
    }

    pub fn layout(&self) -> Option<&MatrixLayout> {
        self.layout.as_ref()
    }

    pub fn legend_visible(&self) -> bool {
        self.state.legend_visible
    }

    fn ensure_layout(&mut self, aggregates: &[ComputedAggregate], size: Vec2) {
        if self.layout.is_some() && self.laid_out_size == size {
            return;
        }
        let frame = TreemapRect::new(0.0, 0.0, size.x, size.y);
        let layout = matrix_layout(aggregates, frame, &self.style);
        self.index = SpatialIndex::from_layout(&layout);
        tracing::debug!(
            items = self.index.len(),
            width = size.x,
            height = size.y,
            "matrix layout rebuilt"
        );
        self.layout = Some(layout);
        self.laid_out_size = size;
    }

    /// Paint the matrix and its legend; returns this frame's interaction
    pub fn show(
        &mut self,
        ui: &mut Ui,
        aggregates: &[ComputedAggregate],
        volume_type: VolumeType,
    ) -> ChartAction {
        let mut action = ChartAction::default();
        if aggregates.is_empty() {
            ui.weak("No aggregates for this selection");
            return action;
        }

        let width = ui.available_width().max(MIN_WIDTH);
        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(width, width * ASPECT), Sense::click());
        self.ensure_layout(aggregates, rect.size());
        let Some(layout) = self.layout.as_ref() else {
            return action;
        };
        let offset = rect.min.to_vec2();

        // Hover and click
        let pointer = response.hover_pos();
        let hit = pointer
            .map(|p| p - offset)
            .and_then(|local| self.index.hit_test([local.x, local.y]))
            .map(|b| b.index)
            .filter(|i| *i < aggregates.len());
        self.state
            .set_hover(hit.map(ChartItem::Aggregate), pointer.map(|p| p - offset));

        if let (Some(i), Some(pos)) = (hit, pointer) {
            let selection = Selection::from_aggregate(&aggregates[i]);
            if response.clicked() {
                tracing::debug!(path = %selection.hierarchy_path, "matrix selection");
                action.selected = Some(selection.clone());
            }
            action.hovered = Some(HoverEvent {
                item: ChartItem::Aggregate(i),
                selection,
                pointer: pos,
            });
            response.clone().on_hover_cursor(CursorIcon::PointingHand);
        }

        let painter = ui.painter_at(rect);
        let screen = |r: TreemapRect| r.translate(offset).to_egui();
        painter.rect_filled(rect, 0.0, self.palette.matrix_background);

        self.paint_axes(&painter, layout, rect, volume_type);
        self.paint_cells(&painter, layout, &screen);
        self.paint_items(&painter, layout, aggregates, &screen);
        self.paint_grid(&painter, layout, offset);

        let hovered = (self.state.hovered, self.state.pointer);
        if let (Some(ChartItem::Aggregate(i)), Some(local)) = hovered {
            let content = TooltipContent::for_aggregate(&aggregates[i], volume_type);
            let placement = TooltipPlacement::matrix();
            let origin = placement.place(local, rect.size()) + offset;
            paint_tooltip(&painter, origin, &placement, &content, &self.palette);
        }

        action.legend_toggled = self.legend_ui(ui, volume_type);
        action
    }

    fn paint_axes(
        &self,
        painter: &egui::Painter,
        layout: &MatrixLayout,
        rect: Rect,
        volume_type: VolumeType,
    ) {
        let origin = rect.min;
        let area = layout.chart_area;
        let title_font = FontId::proportional(11.0);
        let class_font = FontId::proportional(13.0);

        let unit = match volume_type {
            VolumeType::Monetary => "$",
            VolumeType::Quantity => "qty",
        };
        paint_rotated_text(
            painter,
            origin + Vec2::new(14.0, area.y + area.h / 2.0),
            -FRAC_PI_2,
            &format!("Volume ({unit}) ↑"),
            title_font.clone(),
            self.palette.axis_title,
        );
        painter.text(
            origin + Vec2::new(area.x + area.w / 2.0, rect.height() - 6.0),
            Align2::CENTER_BOTTOM,
            "Variance %  →",
            title_font,
            self.palette.axis_title,
        );

        for (abc, (y, h)) in AbcClass::ALL.iter().zip(layout.rows) {
            painter.text(
                origin + Vec2::new(area.x - 8.0, y + h / 2.0),
                Align2::CENTER_CENTER,
                abc.as_str(),
                class_font.clone(),
                self.palette.axis_label,
            );
        }

        let bottom = area.y + area.h;
        for (xyz, (x, w)) in XyzClass::ALL.iter().zip(layout.cols) {
            let cx = x + w / 2.0;
            painter.text(
                origin + Vec2::new(cx, bottom + 14.0),
                Align2::CENTER_BOTTOM,
                xyz.as_str(),
                class_font.clone(),
                self.palette.axis_label,
            );
            painter.text(
                origin + Vec2::new(cx, bottom + 28.0),
                Align2::CENTER_BOTTOM,
                band_hint(*xyz),
                FontId::proportional(9.0),
                self.palette.axis_hint,
            );
        }
    }

    fn paint_cells(
        &self,
        painter: &egui::Painter,
        layout: &MatrixLayout,
        screen: &impl Fn(TreemapRect) -> Rect,
    ) {
        for cell in &layout.cells {
            if cell.rect.w < 2.0 || cell.rect.h < 2.0 {
                continue;
            }
            let r = screen(cell.rect);
            painter.rect(
                r,
                0.0,
                self.palette.cell(cell.abc, cell.xyz),
                Stroke::new(1.5, self.palette.grid_line),
            );
            if self.labels.cell_label_visible(&cell.rect) {
                painter.text(
                    r.min + Vec2::new(5.0, 12.0),
                    Align2::LEFT_BOTTOM,
                    cell.key(),
                    FontId::proportional(11.0),
                    self.palette.cell_label(cell.abc, cell.xyz),
                );
            }
        }
    }

    fn paint_items(
        &self,
        painter: &egui::Painter,
        layout: &MatrixLayout,
        aggregates: &[ComputedAggregate],
        screen: &impl Fn(TreemapRect) -> Rect,
    ) {
        let outline = Stroke::new(0.7, Color32::from_white_alpha(166));
        for (cell, index, item) in layout.placed_items() {
            if item.w < 1.0 || item.h < 1.0 {
                continue;
            }
            let Some(aggregate) = aggregates.get(index) else {
                continue;
            };
            let opacity = if self.state.is_hovered(ChartItem::Aggregate(index)) {
                SUB_BOX_HOVER_OPACITY
            } else {
                SUB_BOX_OPACITY
            };
            let fill = self.palette.cell(cell.abc, cell.xyz).gamma_multiply(opacity);
            let r = screen(item.shrink(0.5));
            painter.rect(r, 0.0, fill, outline);

            if let Some(label) = self.labels.sub_box_label(&item, aggregate.display_name()) {
                painter.text(
                    screen(item).center(),
                    Align2::CENTER_CENTER,
                    label.text,
                    FontId::proportional(label.font_size),
                    Color32::WHITE,
                );
            }
        }
    }

    /// White separators between rows and columns
    fn paint_grid(&self, painter: &egui::Painter, layout: &MatrixLayout, offset: Vec2) {
        let area = layout.chart_area;
        let stroke = Stroke::new(2.0, self.palette.grid_line);
        for (y, _) in &layout.rows[1..] {
            painter.line_segment(
                [Pos2::new(area.x, *y) + offset, Pos2::new(area.x + area.w, *y) + offset],
                stroke,
            );
        }
        for (x, _) in &layout.cols[1..] {
            painter.line_segment(
                [Pos2::new(*x, area.y) + offset, Pos2::new(*x, area.y + area.h) + offset],
                stroke,
            );
        }
    }

    /// Legend strip under the chart; returns true when toggled
    fn legend_ui(&mut self, ui: &mut Ui, volume_type: VolumeType) -> bool {
        let toggle = if self.state.legend_visible {
            "⏷ Hide legend"
        } else {
            "⏶ Show legend"
        };
        let toggled = ui.small_button(toggle).clicked();
        if toggled {
            self.state.toggle_legend();
        }

        if self.state.legend_visible {
            ui.horizontal_wrapped(|ui| {
                ui.strong("Cells:");
                for abc in AbcClass::ALL {
                    for xyz in XyzClass::ALL {
                        let (swatch, _) =
                            ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                        ui.painter()
                            .rect_filled(swatch, 2.0, self.palette.cell(abc, xyz));
                        ui.label(format!("{}{}", abc.as_str(), xyz.as_str()));
                    }
                }
                let measure = match volume_type {
                    VolumeType::Monetary => "revenue",
                    VolumeType::Quantity => "quantity",
                };
                ui.weak(format!("Cell & sub-box area = {measure}"));
            });
        }
        toggled
    }
}
