//! Synthetic demand data
//!
//! Deterministic stand-in for an ERP feed: an Apparel/Footwear taxonomy of
//! SKUs and 24 months (2024-01 .. 2025-12) of sales with seasonality,
//! per-product volatility and lag forecasts whose error grows with the lag.
//!
//! Volatility classes by `(n * 13) % 100` where `n` is the product number:
//!
//! | index   | class    | random factor |
//! |---------|----------|---------------|
//! | 0..30   | stable   | ±15 %         |
//! | 30..80  | moderate | ±40 %         |
//! | 80..100 | high     | ±70 %         |

use chrono::NaiveDate;
use demand_types::{ForecastLags, Period, Product, TimeSeriesFact};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::DataConfig;
use crate::hierarchy::HierarchyIndex;

const LEVEL1: [&str; 2] = ["Apparel", "Footwear"];

const APPAREL_LEVEL2: [&str; 5] = [
    "Men's Casual",
    "Women's Casual",
    "Men's Performance",
    "Women's Performance",
    "Kids",
];

const FOOTWEAR_LEVEL2: [&str; 5] = [
    "Men's Running",
    "Women's Running",
    "Men's Training",
    "Women's Training",
    "Kids",
];

const LEVEL3: [&str; 10] = [
    "T-Shirts",
    "Polo Shirts",
    "Shorts",
    "Jackets",
    "Pants",
    "Tanks",
    "Sweatshirts",
    "Hoodies",
    "Compression",
    "Baselayer",
];

const SKU_SUFFIX: [&str; 10] = [
    "Core", "Pro", "Elite", "Lite", "Max", "Ultra", "Basic", "Premium", "Plus", "Nano",
];

const FIRST_YEAR: i32 = 2024;
const LAST_YEAR: i32 = 2025;

/// Half-widths of the forecast error band for lag 1/5/10/15
const LAG_ERROR: [f64; 4] = [0.1, 0.2, 0.3, 0.4];

#[derive(Debug, Clone)]
pub struct SyntheticDemand {
    seed: u64,
    product_count: usize,
}

impl Default for SyntheticDemand {
    fn default() -> Self {
        Self::from(&DataConfig::default())
    }
}

impl From<&DataConfig> for SyntheticDemand {
    fn from(config: &DataConfig) -> Self {
        Self::new(config.seed, config.product_count)
    }
}

impl SyntheticDemand {
    pub fn new(seed: u64, product_count: usize) -> Self {
        Self {
            seed,
            product_count,
        }
    }

    pub fn products(&self) -> Vec<Product> {
        (0..self.product_count).map(synthetic_product).collect()
    }

    /// Monthly facts for `products`, reproducible for a given seed
    pub fn facts(&self, products: &[Product]) -> Vec<TimeSeriesFact> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let periods = periods();
        let mut facts = Vec::with_capacity(products.len() * periods.len());

        for product in products {
            let n = product_number(&product.id);
            let base_qty = 100.0 + (n % 500) as f64;
            let base_price = 20.0 + ((n * 7) % 80) as f64;
            let spread = volatility_spread((n * 13) % 100);

            for period in &periods {
                let factor = rng.gen_range(1.0 - spread..1.0 + spread);
                let seasonal = seasonal_factor(&product.level1, period.month());
                let qty = (base_qty * seasonal * factor).round();

                let [lag1, lag5, lag10, lag15] = LAG_ERROR.map(|half| {
                    let err = rng.gen_range(-half..half);
                    Some((qty * (1.0 + err)).round())
                });

                facts.push(TimeSeriesFact {
                    product_id: product.id.clone(),
                    period: period.clone(),
                    sales_qty: qty,
                    sales_volume: qty * base_price,
                    forecasts: ForecastLags {
                        lag1,
                        lag5,
                        lag10,
                        lag15,
                    },
                });
            }
        }
        facts
    }

    /// Products and facts wrapped in an index
    pub fn build(&self) -> HierarchyIndex {
        let products = self.products();
        let facts = self.facts(&products);
        info!(
            seed = self.seed,
            products = products.len(),
            facts = facts.len(),
            "Generated synthetic demand data"
        );
        HierarchyIndex::new(products, facts)
    }
}

fn synthetic_product(i: usize) -> Product {
    let level1 = LEVEL1[i % 2];
    let level2_list = if level1 == "Apparel" {
        &APPAREL_LEVEL2
    } else {
        &FOOTWEAR_LEVEL2
    };
    let number = i + 1;

    Product {
        id: format!("prod-{number:04}"),
        level1: level1.to_string(),
        level2: level2_list[i % level2_list.len()].to_string(),
        level3: LEVEL3[(i * 3) % LEVEL3.len()].to_string(),
        level4: format!("SKU-{number:04}-{}", SKU_SUFFIX[i % SKU_SUFFIX.len()]),
        launch_date: date(2020 + (i % 5) as i32, 1 + (i % 12) as u32, 1 + (i % 28) as u32),
        eol_date: date(
            2026 + (i % 3) as i32,
            1 + ((i + 3) % 12) as u32,
            1 + ((i + 7) % 28) as u32,
        ),
    }
}

/// Day is always <= 28 so every generated date exists
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn periods() -> Vec<Period> {
    (FIRST_YEAR..=LAST_YEAR)
        .flat_map(|year| (1..=12).filter_map(move |month| Period::new(year, month).ok()))
        .collect()
}

/// Numeric part of `prod-0042`
fn product_number(id: &str) -> usize {
    id.rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn seasonal_factor(level1: &str, month: u32) -> f64 {
    if level1 == "Apparel" {
        0.8 + if (5..=8).contains(&month) { 0.5 } else { 0.0 }
    } else {
        0.9 + if (3..=6).contains(&month) { 0.3 } else { 0.0 }
    }
}

fn volatility_spread(index: usize) -> f64 {
    match index {
        0..=29 => 0.15,
        30..=79 => 0.4,
        _ => 0.7,
    }
}
