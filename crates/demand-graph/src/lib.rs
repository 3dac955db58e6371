//! Demand chart layouts and widgets
//!
//! Layout code is pure and independent of egui's frame loop; the `chart`
//! widgets cache its output and only paint.
//!
//! ```text
//!   ComputedAggregate[] ──► treemap::matrix_layout ──► spatial::SpatialIndex
//!            │                                               │ hit test
//!            └─────────► sunburst::SunburstTree              ▼
//!                          (arena, polar hit test)     chart::AbcXyzChart
//!                                  │                         │
//!                                  ▼                         ▼
//!                        chart::SunburstChart ──────► interaction::ChartAction
//!                                                            │
//!                                                     ChartEvents observers
//! ```

pub mod chart;
pub mod colors;
pub mod format;
pub mod interaction;
pub mod labels;
pub mod spatial;
pub mod sunburst;
pub mod tooltip;
pub mod treemap;

pub use chart::{AbcXyzChart, SeriesChart, SunburstChart};
pub use colors::{
    abc_badge_colors, cell_color, label_fg, plasma_color, xyz_badge_colors, Palette,
};
pub use format::{format_metric, format_variance, format_volume, format_volume_table};
pub use interaction::{
    ChartAction, ChartEvents, ChartItem, HoverEvent, InteractionState, Selection,
};
pub use labels::{truncate_label, SunburstLabelPolicy, TreemapLabelPolicy};
pub use spatial::{SpatialBox, SpatialIndex};
pub use sunburst::{NodeId, RingGeometry, SunburstNode, SunburstTree};
pub use tooltip::{TooltipContent, TooltipPlacement};
pub use treemap::{matrix_layout, squarify, MatrixCell, MatrixLayout, MatrixStyle, TreemapRect};
