//! Monthly sales/forecast facts

use serde::{Deserialize, Serialize};

use crate::TypeError;

// ============================================================================
// PERIOD
// ============================================================================

/// Calendar month in `YYYY-MM` form.
///
/// Ordering is the string ordering, which for zero-padded months is also
/// chronological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, TypeError> {
        format!("{:04}-{:02}", year, month).parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.0[..4].parse().unwrap_or_default()
    }

    pub fn month(&self) -> u32 {
        self.0[5..].parse().unwrap_or_default()
    }

    /// Short axis label, e.g. "03/25"
    pub fn short_label(&self) -> String {
        format!("{:02}/{:02}", self.month(), self.year() % 100)
    }
}

impl std::str::FromStr for Period {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(TypeError::InvalidPeriod(s.to_string()));
        }
        let month: u32 = s[5..]
            .parse()
            .map_err(|_| TypeError::InvalidPeriod(s.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(TypeError::InvalidPeriod(s.to_string()));
        }
        Ok(Period(s.to_string()))
    }
}

impl TryFrom<String> for Period {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.0
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// FORECASTS
// ============================================================================

/// Forecast horizon in months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastLag {
    Lag1,
    Lag5,
    Lag10,
    Lag15,
}

impl ForecastLag {
    pub const ALL: [ForecastLag; 4] = [
        ForecastLag::Lag1,
        ForecastLag::Lag5,
        ForecastLag::Lag10,
        ForecastLag::Lag15,
    ];

    pub fn months(&self) -> u32 {
        match self {
            ForecastLag::Lag1 => 1,
            ForecastLag::Lag5 => 5,
            ForecastLag::Lag10 => 10,
            ForecastLag::Lag15 => 15,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ForecastLag::Lag1 => "Forecast (Lag 1)",
            ForecastLag::Lag5 => "Forecast (Lag 5)",
            ForecastLag::Lag10 => "Forecast (Lag 10)",
            ForecastLag::Lag15 => "Forecast (Lag 15)",
        }
    }

    pub fn get(&self, lags: &ForecastLags) -> Option<f64> {
        match self {
            ForecastLag::Lag1 => lags.lag1,
            ForecastLag::Lag5 => lags.lag5,
            ForecastLag::Lag10 => lags.lag10,
            ForecastLag::Lag15 => lags.lag15,
        }
    }
}

/// Forecast values per horizon; `None` where no forecast was issued
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastLags {
    #[serde(default)]
    pub lag1: Option<f64>,
    #[serde(default)]
    pub lag5: Option<f64>,
    #[serde(default)]
    pub lag10: Option<f64>,
    #[serde(default)]
    pub lag15: Option<f64>,
}

// ============================================================================
// FACTS
// ============================================================================

/// One fact row per product per month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesFact {
    pub product_id: String,
    pub period: Period,
    pub sales_qty: f64,
    pub sales_volume: f64,
    pub forecasts: ForecastLags,
}

/// One period of a rolled-up time series for the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub period: Period,
    pub sales_qty: f64,
    pub sales_volume: f64,
    pub lag1: Option<f64>,
    pub lag5: Option<f64>,
    pub lag10: Option<f64>,
    pub lag15: Option<f64>,
}

impl SeriesPoint {
    pub fn lag(&self, lag: ForecastLag) -> Option<f64> {
        match lag {
            ForecastLag::Lag1 => self.lag1,
            ForecastLag::Lag5 => self.lag5,
            ForecastLag::Lag10 => self.lag10,
            ForecastLag::Lag15 => self.lag15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse() {
        let p: Period = "2025-03".parse().unwrap();
        assert_eq!(p.year(), 2025);
        assert_eq!(p.month(), 3);
        assert_eq!(p.short_label(), "03/25");
        assert!("2025-13".parse::<Period>().is_err());
        assert!("2025-3".parse::<Period>().is_err());
        assert!("25-03-01".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_ordering_is_chronological() {
        let a = Period::new(2024, 12).unwrap();
        let b = Period::new(2025, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_fact_json_shape() {
        let json = r#"{
            "productId": "prod-0001",
            "period": "2024-01",
            "salesQty": 120.0,
            "salesVolume": 2400.0,
            "forecasts": { "lag1": 118.0, "lag5": null }
        }"#;
        let fact: TimeSeriesFact = serde_json::from_str(json).unwrap();
        assert_eq!(fact.forecasts.lag1, Some(118.0));
        assert_eq!(fact.forecasts.lag5, None);
        assert_eq!(fact.forecasts.lag15, None);
        assert_eq!(ForecastLag::Lag1.get(&fact.forecasts), Some(118.0));
    }
}
