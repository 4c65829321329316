//! Loader → Aggregator → Classifier, run once at start-up.
//!
//! The result is a [`WasteReport`]: an immutable context holding every
//! derived table, built explicitly and handed to whatever serves requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use wastemap::WasteReport;
//!
//! let report = WasteReport::load("data/sipsn_waste.csv")?;
//! for (category, count) in report.tables().counts.entries() {
//!     println!("{category}: {count}");
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::aggregate::{province_averages, yearly_totals};
use super::classify::{classify, tally};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{Category, CategoryCounts, ClassifiedProvince, Observation, YearProvinceTotal};
use crate::parser::{exclude_incomplete_year, load_bytes, load_file, SourceFormat, EXCLUDED_YEAR};

/// The three derived tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTables {
    /// One row per (year, province), sorted by year then province
    pub totals: Vec<YearProvinceTotal>,
    /// One row per province with an average, sorted by province
    pub provinces: Vec<ClassifiedProvince>,
    /// Provinces with no retained observations
    pub without_data: Vec<String>,
    /// Tier tally over `provinces`
    pub counts: CategoryCounts,
}

/// Retained and excluded row counts of one derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub retained: usize,
    pub excluded: usize,
}

/// Where the data came from and what the loader did with it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadInfo {
    pub source: Option<String>,
    /// `None` when the observations did not come through the file loader
    pub format: Option<SourceFormat>,
    pub raw_rows: usize,
    pub retained_rows: usize,
    pub excluded_rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Immutable, fully derived view of the dataset.
#[derive(Debug, Clone)]
pub struct WasteReport {
    tables: DerivedTables,
    info: LoadInfo,
}

impl WasteReport {
    /// Load, clean, aggregate and classify a dataset file.
    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let dataset = load_file(path).inspect_err(|e| error!(%e, "dataset load failed"))?;
        Self::build(
            dataset.observations,
            Some(dataset.format),
            Some(path.display().to_string()),
        )
    }

    /// Same as [`WasteReport::load`] for in-memory bytes.
    pub fn from_bytes(bytes: &[u8]) -> PipelineResult<Self> {
        let dataset = load_bytes(bytes).inspect_err(|e| error!(%e, "dataset load failed"))?;
        Self::build(dataset.observations, Some(dataset.format), None)
    }

    /// Build a report from already validated observations.
    pub fn from_observations(observations: Vec<Observation>) -> PipelineResult<Self> {
        Self::build(observations, None, None)
    }

    fn build(
        observations: Vec<Observation>,
        format: Option<SourceFormat>,
        source: Option<String>,
    ) -> PipelineResult<Self> {
        let raw_rows = observations.len();
        let (tables, rows) = derive_tables(observations)?;

        info!(
            provinces = tables.provinces.len(),
            without_data = tables.without_data.len(),
            green = tables.counts.get(Category::Green),
            orange = tables.counts.get(Category::Orange),
            red = tables.counts.get(Category::Red),
            "derived tables ready"
        );

        Ok(Self {
            tables,
            info: LoadInfo {
                source,
                format,
                raw_rows,
                retained_rows: rows.retained,
                excluded_rows: rows.excluded,
                loaded_at: Utc::now(),
            },
        })
    }

    /// All derived tables.
    pub fn tables(&self) -> &DerivedTables {
        &self.tables
    }

    /// Load metadata.
    pub fn info(&self) -> &LoadInfo {
        &self.info
    }

    /// Yearly totals restricted to the given provinces, in table order.
    pub fn totals_for<S: AsRef<str>>(&self, provinces: &[S]) -> Vec<YearProvinceTotal> {
        self.tables
            .totals
            .iter()
            .filter(|t| provinces.iter().any(|p| p.as_ref() == t.province))
            .cloned()
            .collect()
    }
}

/// Pure transform: observations → derived tables.
///
/// Also returns the retained and excluded row counts.
pub fn derive_tables(
    observations: Vec<Observation>,
) -> PipelineResult<(DerivedTables, RowCounts)> {
    let cleaned = exclude_incomplete_year(observations);
    if cleaned.retained.is_empty() {
        return Err(PipelineError::NoRetainedObservations {
            excluded_year: EXCLUDED_YEAR,
            excluded: cleaned.excluded,
        });
    }

    let totals = yearly_totals(&cleaned.retained);
    let averages = province_averages(&totals, &cleaned.provinces_seen);
    let provinces = classify(&averages.averages);
    let counts = tally(&provinces);

    let tables = DerivedTables {
        totals,
        provinces,
        without_data: averages.without_data,
        counts,
    };
    let rows = RowCounts {
        retained: cleaned.retained.len(),
        excluded: cleaned.excluded,
    };
    Ok((tables, rows))
}
