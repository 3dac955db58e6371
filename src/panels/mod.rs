//! UI Panels
//!
//! Each panel is a function that takes the data it renders and returns an
//! action value. Panels do NOT own state; the app applies the actions.

mod controls;
mod legend;
mod master_table;
mod series_window;

pub use controls::{controls, ControlsAction, ControlsData};
pub use legend::classification_legend;
pub use master_table::{master_table, MasterTableAction, MasterTableData};
pub use series_window::{series_window, SeriesWindowAction, SeriesWindowData};
