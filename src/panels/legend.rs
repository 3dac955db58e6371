//! Classification legend under the ABC-XYZ tab

use demand_engine::ClassificationConfig;
use demand_types::{AbcClass, XyzClass};
use egui::{Color32, RichText, Ui};

use demand_graph::{abc_badge_colors, xyz_badge_colors};

/// Legend lines derived from the active thresholds
pub fn abc_lines(config: &ClassificationConfig) -> [(AbcClass, String); 3] {
    let a = config.abc_a_share * 100.0;
    let b = config.abc_b_share * 100.0;
    [
        (AbcClass::A, format!("A: Top {a:.0}% cumulative volume")),
        (AbcClass::B, format!("B: Next {:.0}% cumulative volume", b - a)),
        (AbcClass::C, format!("C: Remaining {:.0}%", 100.0 - b)),
    ]
}

pub fn xyz_lines(config: &ClassificationConfig) -> [(XyzClass, String); 3] {
    let x = config.xyz_x_max;
    let y = config.xyz_y_max;
    [
        (XyzClass::X, format!("X: Variance ≤ {x:.0}% (stable)")),
        (XyzClass::Y, format!("Y: {x:.0}% < Variance ≤ {y:.0}%")),
        (XyzClass::Z, format!("Z: Variance > {y:.0}% (unstable)")),
    ]
}

const RECOMMENDATIONS: [&str; 4] = [
    "AX: Standard forecasting",
    "AZ/AY: Improved forecasting needed",
    "BX/CX: Focus forecast efforts",
    "CZ: High variability - buffer stock",
];

pub fn classification_legend(ui: &mut Ui, config: &ClassificationConfig) {
    ui.label(RichText::new("Classification Legend").strong());
    ui.add_space(4.0);

    ui.columns(3, |columns| {
        columns[0].label(RichText::new("ABC Classification (Value)").strong());
        for (abc, text) in abc_lines(config) {
            let (_, dot) = abc_badge_colors(abc);
            columns[0].horizontal(|ui| {
                ui.label(RichText::new("●").color(dot));
                ui.label(text);
            });
        }

        columns[1].label(RichText::new("XYZ Classification (Variance)").strong());
        for (xyz, text) in xyz_lines(config) {
            let (_, mark) = xyz_badge_colors(xyz);
            columns[1].horizontal(|ui| {
                ui.label(RichText::new("■").color(mark));
                ui.label(text);
            });
        }

        columns[2].label(RichText::new("Recommendations").strong());
        for line in RECOMMENDATIONS {
            columns[2].label(RichText::new(format!("• {line}")).color(Color32::GRAY));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_legend_text() {
        let config = ClassificationConfig::default();
        let abc: Vec<String> = abc_lines(&config).into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            abc,
            vec![
                "A: Top 20% cumulative volume".to_string(),
                "B: Next 40% cumulative volume".to_string(),
                "C: Remaining 40%".to_string(),
            ]
        );
        assert_eq!(xyz_lines(&config)[1].1, "Y: 20% < Variance ≤ 40%");
    }
}
