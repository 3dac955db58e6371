//! Demand Analysis application
//!
//! Owns the hierarchy index, the current control values and every derived
//! value (aggregates, chart caches, selection). Panels return actions; the
//! app applies them after rendering.
//!
//! Aggregates are recomputed only when level or volume type change. Chart
//! layouts are invalidated at the same time and rebuilt lazily on the next
//! frame (or when their allocated size changes).

use std::path::{Path, PathBuf};

use demand_engine::{
    aggregate_series, AggregationEngine, ChartSettings, DashboardConfig, HierarchyIndex,
};
use demand_graph::{
    AbcXyzChart, ChartAction, ChartEvents, MatrixStyle, Palette, RingGeometry, Selection,
    SunburstChart, SunburstLabelPolicy, TreemapLabelPolicy,
};
use demand_types::{ComputedAggregate, DemandTab, HierarchyLevel, SeriesPoint, VolumeType};
use egui::RichText;
use tracing::{debug, info, warn};

use crate::export::{export_aggregates, export_series};
use crate::panels::{
    self, ControlsAction, ControlsData, MasterTableAction, MasterTableData, SeriesWindowAction,
    SeriesWindowData,
};

pub struct DemandAnalysisApp {
    config: DashboardConfig,
    index: HierarchyIndex,
    engine: AggregationEngine,

    // Controls
    level: HierarchyLevel,
    volume_type: VolumeType,
    tab: DemandTab,

    // Derived data, replaced wholesale on control change
    aggregates: Vec<ComputedAggregate>,
    /// The sunburst always shows the full hierarchy
    sunburst_aggregates: Vec<ComputedAggregate>,

    // Widgets
    matrix: AbcXyzChart,
    sunburst: SunburstChart,
    events: ChartEvents,

    // Selection / detail window
    selection: Option<Selection>,
    series: Vec<SeriesPoint>,
    show_series: bool,

    export_dir: PathBuf,
    status: Option<String>,
}

fn matrix_chart(settings: &ChartSettings) -> AbcXyzChart {
    let style = MatrixStyle {
        gutter: settings.treemap_gutter,
        label_band: settings.treemap_label_band,
        ..MatrixStyle::default()
    };
    let labels = TreemapLabelPolicy {
        min_width: settings.treemap_label_min_width,
        min_height: settings.treemap_label_min_height,
        ..TreemapLabelPolicy::default()
    };
    AbcXyzChart::new(style, labels, Palette::default())
}

fn sunburst_chart(settings: &ChartSettings) -> SunburstChart {
    let geometry = RingGeometry {
        inner_radius: settings.sunburst_inner_radius,
        ring_width: settings.sunburst_ring_width,
        ..RingGeometry::default()
    };
    let labels = SunburstLabelPolicy {
        min_arc: settings.sunburst_label_min_arc,
        ..SunburstLabelPolicy::default()
    };
    SunburstChart::new(geometry, labels, Palette::default())
}

/// Logging observers on chart events
fn chart_events() -> ChartEvents {
    let mut events = ChartEvents::new();
    events.on_hover(|hover| {
        if let Some(hover) = hover {
            tracing::trace!(path = %hover.selection.hierarchy_path, "hover");
        }
    });
    events.on_select(|selection| {
        info!(
            path = %selection.hierarchy_path,
            volume = selection.volume,
            variance = selection.variance_percent,
            "element selected"
        );
    });
    events.on_legend_toggle(|visible| debug!(visible, "legend toggled"));
    events
}

impl DemandAnalysisApp {
    pub fn new(config: DashboardConfig, index: HierarchyIndex) -> Self {
        let engine = AggregationEngine::new(config.classification.clone());
        let mut app = Self {
            matrix: matrix_chart(&config.charts),
            sunburst: sunburst_chart(&config.charts),
            events: chart_events(),
            engine,
            index,
            config,
            level: HierarchyLevel::L4,
            volume_type: VolumeType::Monetary,
            tab: DemandTab::AbcXyz,
            aggregates: Vec::new(),
            sunburst_aggregates: Vec::new(),
            selection: None,
            series: Vec::new(),
            show_series: false,
            export_dir: PathBuf::from("."),
            status: None,
        };
        app.recompute();
        app
    }

    /// Directory CSV exports are written to
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn level(&self) -> HierarchyLevel {
        self.level
    }

    pub fn volume_type(&self) -> VolumeType {
        self.volume_type
    }

    pub fn tab(&self) -> DemandTab {
        self.tab
    }

    pub fn aggregates(&self) -> &[ComputedAggregate] {
        &self.aggregates
    }

    pub fn sunburst_aggregates(&self) -> &[ComputedAggregate] {
        &self.sunburst_aggregates
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Rows shown in the master table for the active tab
    pub fn table_aggregates(&self) -> &[ComputedAggregate] {
        match self.tab {
            DemandTab::AbcXyz => &self.aggregates,
            DemandTab::Sunburst => &self.sunburst_aggregates,
        }
    }

    fn table_level(&self) -> HierarchyLevel {
        match self.tab {
            DemandTab::AbcXyz => self.level,
            DemandTab::Sunburst => HierarchyLevel::L4,
        }
    }

    /// Recompute both aggregate sets and drop every derived cache
    pub fn recompute(&mut self) {
        self.aggregates = self.engine.compute(&self.index, self.volume_type, self.level);
        self.sunburst_aggregates = if self.level == HierarchyLevel::L4 {
            self.aggregates.clone()
        } else {
            self.engine
                .compute(&self.index, self.volume_type, HierarchyLevel::L4)
        };
        self.matrix.invalidate();
        self.sunburst.invalidate();
        self.selection = None;
        self.series.clear();
        self.show_series = false;
        info!(
            level = self.level.depth(),
            volume_type = self.volume_type.as_str(),
            groups = self.aggregates.len(),
            "aggregates recomputed"
        );
    }

    pub fn apply_controls(&mut self, action: ControlsAction) {
        let mut dirty = false;
        if let Some(level) = action.change_level {
            self.level = level;
            dirty = true;
        }
        if let Some(volume_type) = action.change_volume_type {
            self.volume_type = volume_type;
            dirty = true;
        }
        if let Some(tab) = action.change_tab {
            debug!(tab = tab.display_name(), "tab changed");
            self.tab = tab;
        }
        if dirty {
            self.recompute();
        }
    }

    /// Select an element and open its time-series window
    pub fn select(&mut self, selection: Selection) {
        self.series = aggregate_series(
            &self.index,
            &selection.hierarchy_path,
            self.config.series.window,
        );
        debug!(
            path = %selection.hierarchy_path,
            periods = self.series.len(),
            "time series loaded"
        );
        self.selection = Some(selection);
        self.show_series = true;
    }

    pub fn handle_chart_action(&mut self, action: ChartAction) {
        let legend_visible = match self.tab {
            DemandTab::AbcXyz => self.matrix.legend_visible(),
            DemandTab::Sunburst => self.sunburst.legend_visible(),
        };
        self.events.dispatch(&action, legend_visible);
        if let Some(selection) = action.selected {
            self.select(selection);
        }
    }

    fn handle_table_action(&mut self, action: MasterTableAction) {
        if let Some(index) = action.select {
            if let Some(aggregate) = self.table_aggregates().get(index) {
                let selection = Selection::from_aggregate(aggregate);
                self.select(selection);
            }
        }
        if action.export_csv {
            let result = export_aggregates(
                &self.export_dir,
                self.table_aggregates(),
                self.volume_type,
                self.table_level(),
            );
            self.report_export(result);
        }
    }

    fn handle_series_action(&mut self, ctx: &egui::Context, action: SeriesWindowAction) {
        let Some(selection) = &self.selection else {
            return;
        };
        if action.export_csv {
            let result = export_series(
                &self.export_dir,
                &selection.element_id,
                &self.series,
                self.volume_type,
            );
            self.report_export(result);
        } else if action.copy_json {
            if let Some(aggregate) = &selection.aggregate {
                match serde_json::to_string_pretty(aggregate) {
                    Ok(json) => {
                        ctx.copy_text(json);
                        self.status = Some(format!("Copied {} as JSON", aggregate.element_id));
                    }
                    Err(e) => warn!("Failed to serialize aggregate: {}", e),
                }
            }
        }
    }

    fn report_export(&mut self, result: Result<PathBuf, crate::export::ExportError>) {
        self.status = Some(match result {
            Ok(path) => format!("Exported {}", path.display()),
            Err(e) => {
                warn!("Export failed: {}", e);
                format!("Export failed: {e}")
            }
        });
    }
}

impl eframe::App for DemandAnalysisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut controls_action = ControlsAction::default();
        let mut chart_action = ChartAction::default();
        let mut table_action = MasterTableAction::default();

        // =====================================================================
        // TOP PANEL - Title and controls
        // =====================================================================
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Demand Analysis");
            ui.label(
                RichText::new(
                    "Analyze forecasting performance across product hierarchies. \
                     Use ABC-XYZ classification to identify high-value/high-variance products.",
                )
                .weak(),
            );
            ui.add_space(6.0);
            controls_action = panels::controls(
                ui,
                &ControlsData {
                    level: self.level,
                    volume_type: self.volume_type,
                    tab: self.tab,
                    trailing_window: self.config.classification.trailing_window,
                },
            );
            ui.add_space(6.0);
        });

        // =====================================================================
        // BOTTOM PANEL - Status line
        // =====================================================================
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(format!(
                    "{} products · {} groups",
                    self.index.products().len(),
                    self.aggregates.len()
                ));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.small(status.as_str());
                }
            });
        });

        // =====================================================================
        // CENTRAL PANEL - Chart, master table, legend
        // =====================================================================
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                chart_action = match self.tab {
                    DemandTab::AbcXyz => {
                        self.matrix
                            .show(ui, &self.aggregates, self.volume_type)
                    }
                    DemandTab::Sunburst => {
                        self.sunburst
                            .show(ui, &self.sunburst_aggregates, self.volume_type)
                    }
                };

                ui.add_space(12.0);
                let selected_element = self.selection.as_ref().map(|s| s.element_id.as_str());
                table_action = panels::master_table(
                    ui,
                    &MasterTableData {
                        aggregates: self.table_aggregates(),
                        volume_type: self.volume_type,
                        selected_element,
                    },
                );

                if self.tab == DemandTab::AbcXyz {
                    ui.add_space(12.0);
                    panels::classification_legend(ui, &self.config.classification);
                }
            });
        });

        // =====================================================================
        // DETAIL WINDOW
        // =====================================================================
        let mut series_action = SeriesWindowAction::default();
        if self.show_series {
            if let Some(selection) = &self.selection {
                let mut open = true;
                series_action = panels::series_window(
                    ctx,
                    &SeriesWindowData {
                        selection,
                        points: &self.series,
                        volume_type: self.volume_type,
                    },
                    &mut open,
                );
                self.show_series = open;
            }
        }

        // Apply actions after rendering
        self.handle_chart_action(chart_action);
        self.handle_table_action(table_action);
        self.handle_series_action(ctx, series_action);
        if !controls_action.is_empty() {
            self.apply_controls(controls_action);
        }
    }
}
