//! Demand Analysis dashboard
//!
//! Loads the dashboard config, builds the synthetic demand dataset and opens
//! the native window.
//!
//! Usage:
//!   cargo run --bin demand_dashboard
//!   DEMAND_CONFIG=path/to/dashboard.yaml RUST_LOG=debug cargo run --bin demand_dashboard

use anyhow::{anyhow, Context, Result};
use demand_engine::{ConfigLoader, SyntheticDemand};
use demand_lens::DemandAnalysisApp;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::from_env()
        .load()
        .context("Failed to load dashboard configuration")?;

    let index = SyntheticDemand::from(&config.data).build();
    info!(
        products = index.products().len(),
        facts = index.facts().len(),
        "Synthetic demand dataset ready"
    );

    let export_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let app = DemandAnalysisApp::new(config, index).with_export_dir(export_dir);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Demand Analysis")
            .with_inner_size([1280.0, 960.0])
            .with_min_inner_size([900.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Demand Analysis",
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_theme(egui::Theme::Light);
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow!("eframe error: {e}"))
}
