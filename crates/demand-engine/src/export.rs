//! CSV export of the master table and the time-series detail

use std::io::Write;

use demand_types::{ComputedAggregate, HierarchyLevel, SeriesPoint, VolumeType};

use crate::error::EngineError;

pub const AGGREGATE_HEADER: [&str; 5] = ["Hierarchy Path", "Volume", "Variance", "ABC", "XYZ"];

pub const SERIES_HEADER: [&str; 6] = [
    "Period",
    "Actual Sales",
    "Forecast Lag 1",
    "Forecast Lag 5",
    "Forecast Lag 10",
    "Forecast Lag 15",
];

/// One row per aggregate; variance is written with two decimals
pub fn write_aggregates_csv<W: Write>(
    writer: W,
    aggregates: &[ComputedAggregate],
) -> Result<(), EngineError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(AGGREGATE_HEADER)?;
    for agg in aggregates {
        csv.write_record([
            agg.hierarchy_path.clone(),
            agg.volume_total.to_string(),
            format!("{:.2}", agg.variance_percent),
            agg.abc_class.as_str().to_string(),
            agg.xyz_class.as_str().to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// One row per period; "Actual Sales" follows the volume type and absent
/// lags are left blank
pub fn write_series_csv<W: Write>(
    writer: W,
    points: &[SeriesPoint],
    volume_type: VolumeType,
) -> Result<(), EngineError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(SERIES_HEADER)?;
    for point in points {
        let actual = match volume_type {
            VolumeType::Monetary => point.sales_volume,
            VolumeType::Quantity => point.sales_qty,
        };
        let lag = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        csv.write_record([
            point.period.to_string(),
            actual.to_string(),
            lag(point.lag1),
            lag(point.lag5),
            lag(point.lag10),
            lag(point.lag15),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// File name for a master table export, e.g. `demand-analysis-monetary-level4.csv`
pub fn aggregates_file_name(volume_type: VolumeType, level: HierarchyLevel) -> String {
    format!(
        "demand-analysis-{}-level{}.csv",
        volume_type.as_str(),
        level.depth()
    )
}

/// File name for a detail export, e.g. `timeseries-Apparel-Kids.csv`
pub fn series_file_name(element_id: &str) -> String {
    format!("timeseries-{element_id}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use demand_types::{AbcClass, XyzClass};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aggregates_csv() {
        let aggregates = vec![ComputedAggregate {
            element_id: "Apparel-Kids".into(),
            hierarchy_path: "Apparel/Kids".into(),
            volume_total: 2400.0,
            variance_percent: 12.346,
            abc_class: AbcClass::B,
            xyz_class: XyzClass::X,
            aggregates: BTreeMap::new(),
        }];
        let mut out = Vec::new();
        write_aggregates_csv(&mut out, &aggregates).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Hierarchy Path,Volume,Variance,ABC,XYZ\nApparel/Kids,2400,12.35,B,X\n"
        );
    }

    #[test]
    fn test_series_csv_blank_lags() {
        let points = vec![SeriesPoint {
            period: "2024-05".parse().unwrap(),
            sales_qty: 12.0,
            sales_volume: 240.0,
            lag1: Some(11.0),
            lag5: None,
            lag10: None,
            lag15: Some(9.0),
        }];
        let mut out = Vec::new();
        write_series_csv(&mut out, &points, VolumeType::Quantity).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("2024-05,12,11,,,9"));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            aggregates_file_name(VolumeType::Quantity, HierarchyLevel::L2),
            "demand-analysis-quantity-level2.csv"
        );
        assert_eq!(series_file_name("A-B"), "timeseries-A-B.csv");
    }
}
