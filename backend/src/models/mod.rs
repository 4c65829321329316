//! Domain models for the waste aggregation pipeline.
//!
//! - [`Observation`] - one validated row of the source dataset
//! - [`YearProvinceTotal`] - summed annual waste for a (year, province) pair
//! - [`ProvinceAverage`] - multi-year mean of a province's totals
//! - [`Category`] - GREEN / ORANGE / RED risk tier
//! - [`ClassifiedProvince`] - a province average tagged with its tier
//! - [`CategoryCounts`] - fixed-order tally of provinces per tier

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Raw Records
// =============================================================================

/// One record of the waste-generation dataset.
///
/// Regency and daily waste are carried for completeness but never aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub year: i32,
    pub province: String,
    pub regency: String,
    pub daily_waste: Option<f64>,
    /// Annual waste in tons.
    pub annual_waste: f64,
}

// =============================================================================
// Derived Tables
// =============================================================================

/// Total annual waste of every regency in a province for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProvinceTotal {
    pub year: i32,
    pub province: String,
    pub total: f64,
}

/// Mean of a province's yearly totals.
///
/// `years_covered` is the number of distinct years that contributed; it may
/// differ between provinces when their coverage differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceAverage {
    pub province: String,
    pub average: f64,
    pub years_covered: usize,
}

/// A province average with its risk tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedProvince {
    pub province: String,
    pub average: f64,
    pub years_covered: usize,
    pub category: Category,
}

// =============================================================================
// Category
// =============================================================================

/// Risk tier of a province, ordered from lowest to highest waste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Green,
    Orange,
    Red,
}

impl Category {
    /// All tiers in reporting order.
    pub const ALL: [Category; 3] = [Category::Green, Category::Orange, Category::Red];

    /// Upper-case label used in tables and charts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Green => "GREEN",
            Category::Orange => "ORANGE",
            Category::Red => "RED",
        }
    }

    /// Display colour as an RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Category::Green => (0, 128, 0),
            Category::Orange => (255, 165, 0),
            Category::Red => (255, 0, 0),
        }
    }

    fn index(&self) -> usize {
        match self {
            Category::Green => 0,
            Category::Orange => 1,
            Category::Red => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Category Counts
// =============================================================================

/// Number of provinces in each tier.
///
/// Always holds exactly three slots; empty tiers count 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; 3],
}

impl CategoryCounts {
    /// Add one province to a tier.
    pub fn increment(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    /// Count for a single tier.
    pub fn get(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    /// `(category, count)` pairs in GREEN, ORANGE, RED order.
    pub fn entries(&self) -> [(Category, usize); 3] {
        Category::ALL.map(|c| (c, self.get(c)))
    }

    /// Sum over all tiers.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Serialised as an ordered list so the fixed order survives JSON.
impl Serialize for CategoryCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry {
            category: Category,
            count: usize,
        }

        let entries: Vec<Entry> = self
            .entries()
            .into_iter()
            .map(|(category, count)| Entry { category, count })
            .collect();
        entries.serialize(serializer)
    }
}
