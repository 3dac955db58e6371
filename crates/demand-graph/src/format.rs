//! Number formatting for chart labels, tooltips and the master table

use demand_types::VolumeType;

/// Round half away from zero to `digits` decimals; `{:.N}` alone rounds
/// ties to even
fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

fn prefix(volume_type: VolumeType) -> &'static str {
    match volume_type {
        VolumeType::Monetary => "$",
        VolumeType::Quantity => "",
    }
}

/// Compact volume for charts: `$1.2M`, `$12K`, `$950` (no `$` for quantity)
pub fn format_volume(value: f64, volume_type: VolumeType) -> String {
    let p = prefix(volume_type);
    if value >= 1e6 {
        format!("{p}{:.1}M", round_to(value / 1e6, 1))
    } else if value >= 1e3 {
        format!("{p}{:.0}K", round_to(value / 1e3, 0))
    } else {
        format!("{p}{}", value.max(0.0).round() as i64)
    }
}

/// Master table volume: two decimals for millions
pub fn format_volume_table(value: f64, volume_type: VolumeType) -> String {
    let p = prefix(volume_type);
    if value >= 1e6 {
        format!("{p}{:.2}M", round_to(value / 1e6, 2))
    } else if value >= 1e3 {
        format!("{p}{:.0}K", round_to(value / 1e3, 0))
    } else {
        format!("{p}{}", value.round() as i64)
    }
}

/// Tooltip metric line, e.g. "Revenue: $1.2M"
pub fn format_metric(value: f64, volume_type: VolumeType) -> String {
    format!(
        "{}: {}",
        volume_type.metric_label(),
        format_volume(value, volume_type)
    )
}

/// Variance to one decimal with a percent sign
pub fn format_variance(percent: f64) -> String {
    format!("{percent:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(1_234_567.0, VolumeType::Monetary), "$1.2M");
        assert_eq!(format_volume(12_345.0, VolumeType::Monetary), "$12K");
        assert_eq!(format_volume(950.4, VolumeType::Monetary), "$950");
        assert_eq!(format_volume(12_345.0, VolumeType::Quantity), "12K");
        assert_eq!(format_volume(0.0, VolumeType::Quantity), "0");
    }

    #[test]
    fn test_format_volume_rounds_ties_up() {
        assert_eq!(format_volume(2_500.0, VolumeType::Quantity), "3K");
        assert_eq!(format_volume(4_500.0, VolumeType::Monetary), "$5K");
        assert_eq!(format_volume(1_250_000.0, VolumeType::Monetary), "$1.3M");
        assert_eq!(format_volume_table(2_500.0, VolumeType::Quantity), "3K");
        assert_eq!(format_volume_table(1_125_000.0, VolumeType::Monetary), "$1.13M");
    }

    #[test]
    fn test_format_volume_table() {
        assert_eq!(format_volume_table(2_500_000.0, VolumeType::Monetary), "$2.50M");
        assert_eq!(format_volume_table(999.0, VolumeType::Quantity), "999");
    }

    #[test]
    fn test_metric_and_variance() {
        assert_eq!(format_metric(1500.0, VolumeType::Quantity), "Qty: 2K");
        assert_eq!(format_metric(2_000_000.0, VolumeType::Monetary), "Revenue: $2.0M");
        assert_eq!(format_variance(25.0), "25.0%");
        assert_eq!(format_variance(12.345), "12.3%");
    }
}
