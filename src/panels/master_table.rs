//! Product hierarchy master table
//!
//! One row per aggregate with class badges. Clicking a row selects it and
//! opens the time-series window.

use demand_graph::{abc_badge_colors, format_variance, format_volume_table, xyz_badge_colors};
use demand_types::{ComputedAggregate, VolumeType};
use egui::{Align, Color32, Layout, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 22.0;
const TABLE_HEIGHT: f32 = 320.0;

pub struct MasterTableData<'a> {
    pub aggregates: &'a [ComputedAggregate],
    pub volume_type: VolumeType,
    pub selected_element: Option<&'a str>,
}

#[derive(Debug, Default)]
pub struct MasterTableAction {
    /// Index into `aggregates`
    pub select: Option<usize>,
    pub export_csv: bool,
}

pub fn master_table(ui: &mut Ui, data: &MasterTableData<'_>) -> MasterTableAction {
    let mut action = MasterTableAction::default();

    ui.horizontal(|ui| {
        ui.heading("Product Hierarchy");
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.button("⬇ Export CSV").clicked() {
                action.export_csv = true;
            }
            ui.weak(data.volume_type.display_name());
            ui.weak(format!("{} rows", data.aggregates.len()));
        });
    });
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(Sense::click())
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::remainder().at_least(240.0).clip(true))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::exact(48.0))
        .column(Column::exact(48.0))
        .max_scroll_height(TABLE_HEIGHT)
        .header(ROW_HEIGHT, |mut header| {
            for title in ["Hierarchy Path", "Volume", "Variance", "ABC", "XYZ"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, data.aggregates.len(), |mut row| {
                let index = row.index();
                let agg = &data.aggregates[index];
                row.set_selected(data.selected_element == Some(agg.element_id.as_str()));

                row.col(|ui| {
                    ui.label(agg.hierarchy_path.as_str())
                        .on_hover_text(agg.hierarchy_path.as_str());
                });
                row.col(|ui| {
                    ui.monospace(format_volume_table(agg.volume_total, data.volume_type));
                });
                row.col(|ui| {
                    ui.monospace(format_variance(agg.variance_percent));
                });
                row.col(|ui| {
                    let (bg, fg) = abc_badge_colors(agg.abc_class);
                    badge(ui, agg.abc_class.as_str(), bg, fg);
                });
                row.col(|ui| {
                    let (bg, fg) = xyz_badge_colors(agg.xyz_class);
                    badge(ui, agg.xyz_class.as_str(), bg, fg);
                });

                if row.response().clicked() {
                    action.select = Some(index);
                }
            });
        });

    action
}

fn badge(ui: &mut Ui, text: &str, bg: Color32, fg: Color32) {
    egui::Frame::none()
        .fill(bg)
        .rounding(4.0)
        .inner_margin(egui::Margin::symmetric(6.0, 1.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).strong().color(fg));
        });
}
