//! Time-series detail window
//!
//! Summary cards, the actual-vs-forecast line chart and CSV export for one
//! selected hierarchy element.

use demand_graph::{format_variance, format_volume, Selection, SeriesChart};
use demand_types::{SeriesPoint, VolumeType};
use egui::{Color32, RichText, Ui};

pub struct SeriesWindowData<'a> {
    pub selection: &'a Selection,
    pub points: &'a [SeriesPoint],
    pub volume_type: VolumeType,
}

#[derive(Debug, Default, PartialEq)]
pub struct SeriesWindowAction {
    pub export_csv: bool,
    /// Copy the selected aggregate as JSON
    pub copy_json: bool,
}

pub fn series_window(
    ctx: &egui::Context,
    data: &SeriesWindowData<'_>,
    open: &mut bool,
) -> SeriesWindowAction {
    let mut action = SeriesWindowAction::default();

    egui::Window::new(format!("Time Series: {}", data.selection.hierarchy_path))
        .id(egui::Id::new("series_window"))
        .open(open)
        .collapsible(false)
        .resizable(true)
        .default_width(820.0)
        .show(ctx, |ui| {
            summary_cards(ui, data);
            ui.add_space(8.0);

            SeriesChart::default().show(ui, data.points, data.volume_type);
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("⬇ Export CSV").clicked() {
                    action.export_csv = true;
                }
                let has_aggregate = data.selection.aggregate.is_some();
                if ui
                    .add_enabled(has_aggregate, egui::Button::new("Copy JSON"))
                    .clicked()
                {
                    action.copy_json = true;
                }
            });

            ui.add_space(6.0);
            ui.label(
                RichText::new(
                    "Lag values are forecasts made 1, 5, 10 and 15 months ahead. \
                     Dashed lines show how accuracy degrades with longer horizons.",
                )
                .small()
                .weak(),
            );
        });

    action
}

fn summary_cards(ui: &mut Ui, data: &SeriesWindowData<'_>) {
    let selection = data.selection;
    let (abc, xyz) = match &selection.aggregate {
        Some(agg) => (agg.abc_class.as_str(), agg.xyz_class.as_str()),
        None => ("–", "–"),
    };
    let cards = [
        (
            "Total Volume",
            format_volume(selection.volume, data.volume_type),
            Color32::from_rgb(239, 246, 255),
        ),
        (
            "Variance",
            format_variance(selection.variance_percent),
            Color32::from_rgb(255, 251, 235),
        ),
        ("ABC Class", abc.to_string(), Color32::from_rgb(249, 250, 251)),
        ("XYZ Class", xyz.to_string(), Color32::from_rgb(249, 250, 251)),
    ];

    ui.columns(cards.len(), |columns| {
        for (ui, (title, value, fill)) in columns.iter_mut().zip(cards) {
            egui::Frame::none()
                .fill(fill)
                .rounding(6.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(title).small().color(Color32::from_rgb(75, 85, 99)));
                    ui.label(RichText::new(value).strong().color(Color32::from_rgb(17, 24, 39)));
                });
        }
    });
}
