//! Reduce observations to yearly province totals, then to province averages.
//!
//! ```text
//! Observations                  Pass 1: (year, province)     Pass 2: province
//! ┌────────────────────────┐    ┌──────────────────────┐     ┌──────────────────┐
//! │ 2019, A, regency 1, 10 │    │ 2019, A: 30          │     │ A: (30 + 50) / 2 │
//! │ 2019, A, regency 2, 20 │ →  │ 2020, A: 50          │  →  │ B: 5             │
//! │ 2020, A, regency 1, 50 │    │ 2019, B: 5           │     └──────────────────┘
//! │ 2019, B, regency 3, 5  │    └──────────────────────┘
//! └────────────────────────┘
//! ```
//!
//! Values sharing a key are sorted before summing, so totals do not depend on
//! input row order. Outputs are sorted by key.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::error::AggregateError;
use crate::models::{Observation, ProvinceAverage, YearProvinceTotal};

/// Province averages plus the provinces for which no average exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AverageSet {
    /// One entry per province with at least one retained year, sorted by name
    pub averages: Vec<ProvinceAverage>,
    /// Provinces whose average is undefined, sorted by name
    pub without_data: Vec<String>,
}

/// Pass 1: sum annual waste per `(year, province)`.
///
/// Duplicate keys accumulate; nothing is overwritten.
pub fn yearly_totals(observations: &[Observation]) -> Vec<YearProvinceTotal> {
    let mut groups: BTreeMap<(i32, &str), Vec<f64>> = BTreeMap::new();

    for obs in observations {
        groups
            .entry((obs.year, obs.province.as_str()))
            .or_default()
            .push(obs.annual_waste);
    }

    groups
        .into_iter()
        .map(|((year, province), mut values)| YearProvinceTotal {
            year,
            province: province.to_string(),
            total: order_independent_sum(&mut values),
        })
        .collect()
}

/// Pass 2: mean of each province's yearly totals.
///
/// `provinces_seen` lists provinces known before exclusion; any of them with
/// no totals lands in [`AverageSet::without_data`] instead of getting a value.
pub fn province_averages(
    totals: &[YearProvinceTotal],
    provinces_seen: &BTreeSet<String>,
) -> AverageSet {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for province in provinces_seen {
        groups.entry(province.as_str()).or_default();
    }
    for total in totals {
        groups.entry(total.province.as_str()).or_default().push(total.total);
    }

    let mut set = AverageSet::default();
    for (province, mut values) in groups {
        match mean(province, &mut values) {
            Ok(average) => {
                debug!(province, average, years = values.len(), "province average");
                set.averages.push(ProvinceAverage {
                    province: province.to_string(),
                    average,
                    years_covered: values.len(),
                });
            }
            Err(err) => {
                warn!(%err, "province has no average");
                set.without_data.push(province.to_string());
            }
        }
    }
    set
}

/// Arithmetic mean, undefined (an error) for an empty slice.
pub fn mean(province: &str, values: &mut [f64]) -> Result<f64, AggregateError> {
    if values.is_empty() {
        return Err(AggregateError::EmptyProvince(province.to_string()));
    }
    Ok(order_independent_sum(values) / values.len() as f64)
}

fn order_independent_sum(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}
