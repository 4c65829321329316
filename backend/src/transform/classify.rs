//! Risk-tier classification of province averages.
//!
//! | Average annual waste (tons) | Tier   |
//! |-----------------------------|--------|
//! | <= 100,000                  | GREEN  |
//! | <= 700,000                  | ORANGE |
//! | > 700,000                   | RED    |
//!
//! Boundaries belong to the lower tier.

use crate::models::{Category, CategoryCounts, ClassifiedProvince, ProvinceAverage};

/// Highest average still classified GREEN.
pub const GREEN_MAX: f64 = 100_000.0;

/// Highest average still classified ORANGE.
pub const ORANGE_MAX: f64 = 700_000.0;

/// Map an average annual tonnage to its tier.
pub fn categorize(value: f64) -> Category {
    match value {
        v if v <= GREEN_MAX => Category::Green,
        v if v <= ORANGE_MAX => Category::Orange,
        _ => Category::Red,
    }
}

/// Tag every average with its tier, preserving order.
pub fn classify(averages: &[ProvinceAverage]) -> Vec<ClassifiedProvince> {
    averages
        .iter()
        .map(|a| ClassifiedProvince {
            province: a.province.clone(),
            average: a.average,
            years_covered: a.years_covered,
            category: categorize(a.average),
        })
        .collect()
}

/// Count provinces per tier.
pub fn tally(classified: &[ClassifiedProvince]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for province in classified {
        counts.increment(province.category);
    }
    counts
}
