//! Time-series line chart for the detail window
//!
//! Actual sales as a solid line, lag-1 and lag-5 forecasts dashed. Gaps in
//! a forecast break its line instead of being bridged.

use demand_types::{ForecastLag, SeriesPoint, VolumeType};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};

use crate::format::format_volume;

const ACTUAL_COLOR: Color32 = Color32::from_rgb(59, 130, 246); // #3b82f6
const LAG1_COLOR: Color32 = Color32::from_rgb(34, 197, 94); // #22c55e
const LAG5_COLOR: Color32 = Color32::from_rgb(245, 158, 11); // #f59e0b
const GRID_COLOR: Color32 = Color32::from_rgb(229, 231, 235);
const AXIS_COLOR: Color32 = Color32::from_rgb(107, 114, 128);

const MARGIN_LEFT: f32 = 56.0;
const MARGIN_BOTTOM: f32 = 28.0;
const MARGIN_TOP: f32 = 10.0;
const MARGIN_RIGHT: f32 = 12.0;
const Y_TICKS: usize = 5;

/// Value plotted as "Actual Sales" for a volume type
pub fn actual_value(point: &SeriesPoint, volume_type: VolumeType) -> f64 {
    match volume_type {
        VolumeType::Monetary => point.sales_volume,
        VolumeType::Quantity => point.sales_qty,
    }
}

/// One plotted line
struct Line {
    name: &'static str,
    color: Color32,
    dashed: bool,
    values: Vec<Option<f64>>,
}

pub struct SeriesChart {
    pub height: f32,
}

impl Default for SeriesChart {
    fn default() -> Self {
        Self { height: 350.0 }
    }
}

impl SeriesChart {
    /// Paint the chart; returns the index of the hovered period
    pub fn show(
        &self,
        ui: &mut Ui,
        points: &[SeriesPoint],
        volume_type: VolumeType,
    ) -> Option<usize> {
        if points.is_empty() {
            ui.weak("No time series data for this element");
            return None;
        }

        let lines = [
            Line {
                name: "Actual Sales",
                color: ACTUAL_COLOR,
                dashed: false,
                values: points.iter().map(|p| Some(actual_value(p, volume_type))).collect(),
            },
            Line {
                name: ForecastLag::Lag1.display_name(),
                color: LAG1_COLOR,
                dashed: true,
                values: points.iter().map(|p| p.lag(ForecastLag::Lag1)).collect(),
            },
            Line {
                name: ForecastLag::Lag5.display_name(),
                color: LAG5_COLOR,
                dashed: true,
                values: points.iter().map(|p| p.lag(ForecastLag::Lag5)).collect(),
            },
        ];

        let max_value = lines
            .iter()
            .flat_map(|l| l.values.iter().flatten())
            .fold(0.0f64, |acc, v| acc.max(*v));
        let y_max = if max_value > 0.0 { max_value * 1.05 } else { 1.0 };

        let width = ui.available_width().max(200.0);
        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(width, self.height), Sense::hover());
        let plot = Rect::from_min_max(
            rect.min + Vec2::new(MARGIN_LEFT, MARGIN_TOP),
            rect.max - Vec2::new(MARGIN_RIGHT, MARGIN_BOTTOM),
        );
        let step = if points.len() > 1 {
            plot.width() / (points.len() - 1) as f32
        } else {
            0.0
        };
        let x_at = |i: usize| plot.left() + step * i as f32;
        let y_at = |v: f64| plot.bottom() - (v / y_max) as f32 * plot.height();

        let painter = ui.painter_at(rect);
        let axis_font = FontId::proportional(10.0);

        // Grid and y axis
        for tick in 0..=Y_TICKS {
            let value = y_max * tick as f64 / Y_TICKS as f64;
            let y = y_at(value);
            painter.extend(Shape::dashed_line(
                &[Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
                Stroke::new(1.0, GRID_COLOR),
                3.0,
                3.0,
            ));
            painter.text(
                Pos2::new(plot.left() - 6.0, y),
                Align2::RIGHT_CENTER,
                format_volume(value, volume_type),
                axis_font.clone(),
                AXIS_COLOR,
            );
        }

        // x axis labels, thinned so they do not overlap
        let every = ((points.len() as f32 * 44.0 / plot.width().max(1.0)).ceil() as usize).max(1);
        for (i, point) in points.iter().enumerate().step_by(every) {
            painter.text(
                Pos2::new(x_at(i), plot.bottom() + 6.0),
                Align2::CENTER_TOP,
                point.period.short_label(),
                axis_font.clone(),
                AXIS_COLOR,
            );
        }

        for line in &lines {
            let stroke = Stroke::new(2.0, line.color);
            for run in contiguous_runs(&line.values) {
                let path: Vec<Pos2> = run.map(|(i, v)| Pos2::new(x_at(i), y_at(v))).collect();
                if path.len() < 2 {
                    continue;
                }
                if line.dashed {
                    painter.extend(Shape::dashed_line(&path, stroke, 5.0, 5.0));
                } else {
                    painter.add(Shape::line(path, stroke));
                }
            }
        }

        let hovered = response.hover_pos().and_then(|p| {
            if !plot.expand(4.0).contains(p) {
                return None;
            }
            let i = if step > 0.0 {
                ((p.x - plot.left()) / step).round().max(0.0) as usize
            } else {
                0
            };
            Some(i.min(points.len() - 1))
        });

        if let Some(i) = hovered {
            let x = x_at(i);
            painter.line_segment(
                [Pos2::new(x, plot.top()), Pos2::new(x, plot.bottom())],
                Stroke::new(1.0, AXIS_COLOR),
            );
            response.on_hover_ui_at_pointer(|ui| {
                ui.strong(points[i].period.as_str());
                for line in &lines {
                    if let Some(v) = line.values[i] {
                        ui.colored_label(
                            line.color,
                            format!("{}: {}", line.name, format_volume(v, volume_type)),
                        );
                    }
                }
            });
        }

        ui.horizontal(|ui| {
            for line in &lines {
                let (swatch, _) = ui.allocate_exact_size(Vec2::new(16.0, 10.0), Sense::hover());
                ui.painter().line_segment(
                    [swatch.left_center(), swatch.right_center()],
                    Stroke::new(2.0, line.color),
                );
                ui.small(line.name);
            }
        });

        hovered
    }
}

/// Runs of consecutive present values, as (index, value) iterators
fn contiguous_runs(
    values: &[Option<f64>],
) -> impl Iterator<Item = impl Iterator<Item = (usize, f64)> + '_> + '_ {
    let mut starts = Vec::new();
    let mut start = None;
    for (i, v) in values.iter().enumerate() {
        match (v, start) {
            (Some(_), None) => start = Some(i),
            (None, Some(s)) => {
                starts.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        starts.push((s, values.len()));
    }
    starts.into_iter().map(move |(s, e)| {
        values[s..e]
            .iter()
            .enumerate()
            .filter_map(move |(k, v)| v.map(|v| (s + k, v)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contiguous_runs_break_on_gaps() {
        let values = [Some(1.0), Some(2.0), None, Some(4.0), None, None, Some(7.0), Some(8.0)];
        let runs: Vec<Vec<(usize, f64)>> =
            contiguous_runs(&values).map(|run| run.collect()).collect();
        assert_eq!(
            runs,
            vec![
                vec![(0, 1.0), (1, 2.0)],
                vec![(3, 4.0)],
                vec![(6, 7.0), (7, 8.0)],
            ]
        );
        assert_eq!(contiguous_runs(&[None, None]).count(), 0);
    }
}
