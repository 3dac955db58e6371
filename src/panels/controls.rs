//! Configuration controls and tab bar
//!
//! Level selector (ABC-XYZ tab only), volume type, a fixed time-range
//! indicator and the two page tabs.

use demand_types::{DemandTab, HierarchyLevel, VolumeType};
use egui::{RichText, Ui};

/// Data needed to render the controls (extracted before render)
pub struct ControlsData {
    pub level: HierarchyLevel,
    pub volume_type: VolumeType,
    pub tab: DemandTab,
    /// Months in the classification window
    pub trailing_window: usize,
}

/// Actions that can be triggered from the controls
#[derive(Debug, Default, PartialEq)]
pub struct ControlsAction {
    pub change_level: Option<HierarchyLevel>,
    pub change_volume_type: Option<VolumeType>,
    pub change_tab: Option<DemandTab>,
}

impl ControlsAction {
    pub fn is_empty(&self) -> bool {
        self.change_level.is_none()
            && self.change_volume_type.is_none()
            && self.change_tab.is_none()
    }
}

pub fn controls(ui: &mut Ui, data: &ControlsData) -> ControlsAction {
    let mut action = ControlsAction::default();

    ui.horizontal_wrapped(|ui| {
        // Hierarchy level only applies to the matrix; the sunburst is always level 4
        if data.tab == DemandTab::AbcXyz {
            ui.label(RichText::new("Hierarchy Level:").strong());
            for level in HierarchyLevel::ALL {
                if ui
                    .selectable_label(data.level == level, level.display_name())
                    .clicked()
                    && data.level != level
                {
                    action.change_level = Some(level);
                }
            }
            ui.separator();
        }

        ui.label(RichText::new("Volume Type:").strong());
        for volume_type in [VolumeType::Monetary, VolumeType::Quantity] {
            let icon = match volume_type {
                VolumeType::Monetary => "$",
                VolumeType::Quantity => "#",
            };
            if ui
                .selectable_label(
                    data.volume_type == volume_type,
                    format!("{icon} {}", volume_type.display_name()),
                )
                .clicked()
                && data.volume_type != volume_type
            {
                action.change_volume_type = Some(volume_type);
            }
        }
        ui.separator();

        ui.label(RichText::new("Time Range:").strong());
        ui.add_enabled(
            false,
            egui::Button::new(format!("Last {} months", data.trailing_window)),
        );
    });

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        for tab in [DemandTab::AbcXyz, DemandTab::Sunburst] {
            if ui
                .selectable_label(data.tab == tab, RichText::new(tab.display_name()).size(14.0))
                .clicked()
                && data.tab != tab
            {
                action.change_tab = Some(tab);
            }
        }
    });

    action
}
