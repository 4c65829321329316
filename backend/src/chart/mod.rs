//! SVG charts of the derived tables.
//!
//! Every chart is rendered on demand from an immutable [`WasteReport`];
//! rendering never mutates the report and a failure only affects the
//! request that triggered it.

pub mod svg;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::transform::WasteReport;

pub use svg::{average_chart, category_count_chart, trend_chart};

/// The charts the service can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Yearly totals of every province
    TotalAnnualWaste,
    /// Yearly totals of a chosen province subset
    TotalAnnualWasteSpecific,
    /// Province averages coloured by tier
    AverageAnnualWaste,
    /// Number of provinces per tier
    AverageAnnualWasteCategoryCount,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::TotalAnnualWaste,
        ChartKind::TotalAnnualWasteSpecific,
        ChartKind::AverageAnnualWaste,
        ChartKind::AverageAnnualWasteCategoryCount,
    ];

    /// Identifier used in URLs and on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::TotalAnnualWaste => "total_annual_waste",
            ChartKind::TotalAnnualWasteSpecific => "total_annual_waste_specific",
            ChartKind::AverageAnnualWaste => "average_annual_waste",
            ChartKind::AverageAnnualWasteCategoryCount => "average_annual_waste_category_count",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            ChartKind::TotalAnnualWaste => "Total annual waste per province over the years",
            ChartKind::TotalAnnualWasteSpecific => "Total annual waste for selected provinces",
            ChartKind::AverageAnnualWaste => "Average annual waste per province, by category",
            ChartKind::AverageAnnualWasteCategoryCount => "Number of provinces in each category",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.slug() == s)
            .ok_or_else(|| ChartError::UnknownChart(s.to_string()))
    }
}

/// Render one chart as an SVG document.
///
/// `highlight` is only used by [`ChartKind::TotalAnnualWasteSpecific`].
pub fn render(kind: ChartKind, report: &WasteReport, highlight: &[String]) -> ChartResult<String> {
    let tables = report.tables();
    match kind {
        ChartKind::TotalAnnualWaste => trend_chart(
            "Total Annual Waste Generation in Each Province Over the Years",
            &tables.totals,
        ),
        ChartKind::TotalAnnualWasteSpecific => {
            let title = format!(
                "Total Annual Waste Generation in {} Over the Years",
                join_names(highlight)
            );
            trend_chart(&title, &report.totals_for(highlight))
        }
        ChartKind::AverageAnnualWaste => average_chart(&tables.provinces),
        ChartKind::AverageAnnualWasteCategoryCount => category_count_chart(&tables.counts),
    }
}

/// "A", "A and B", "A, B, and C"
fn join_names(names: &[String]) -> String {
    match names {
        [] => "No Provinces".to_string(),
        [one] => one.clone(),
        [a, b] => format!("{} and {}", a, b),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}
