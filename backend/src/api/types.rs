//! JSON response types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{CategoryCounts, ClassifiedProvince};
use crate::parser::SourceFormat;
use crate::transform::WasteReport;

/// Service status and dataset summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub loaded_at: DateTime<Utc>,
    pub source: Option<String>,
    pub format: Option<SourceFormat>,
    pub raw_rows: usize,
    pub retained_rows: usize,
    pub excluded_rows: usize,
    pub provinces: usize,
}

impl From<&WasteReport> for HealthResponse {
    fn from(report: &WasteReport) -> Self {
        let info = report.info();
        HealthResponse {
            status: "ok",
            service: "wastemap",
            version: env!("CARGO_PKG_VERSION"),
            loaded_at: info.loaded_at,
            source: info.source.clone(),
            format: info.format.clone(),
            raw_rows: info.raw_rows,
            retained_rows: info.retained_rows,
            excluded_rows: info.excluded_rows,
            provinces: report.tables().provinces.len(),
        }
    }
}

/// Classified province averages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AveragesResponse {
    pub provinces: Vec<ClassifiedProvince>,
    /// Provinces whose average is undefined
    pub without_data: Vec<String>,
}

impl From<&WasteReport> for AveragesResponse {
    fn from(report: &WasteReport) -> Self {
        let tables = report.tables();
        AveragesResponse {
            provinces: tables.provinces.clone(),
            without_data: tables.without_data.clone(),
        }
    }
}

/// Tier tally, always three entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub counts: CategoryCounts,
    pub total: usize,
}

impl From<&WasteReport> for CategoriesResponse {
    fn from(report: &WasteReport) -> Self {
        let counts = report.tables().counts;
        CategoriesResponse {
            counts,
            total: counts.total(),
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}
