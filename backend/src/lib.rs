//! # Wastemap - Indonesian waste generation by province
//!
//! Wastemap loads the SIPSN waste-generation table, aggregates it by year and
//! province, classifies provinces into GREEN / ORANGE / RED tiers and serves
//! the results as charts over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV File   │────▶│   Loader    │────▶│ Aggregator  │────▶│ Classifier  │
//! │ (SIPSN/KLHK)│     │  (+ 2018    │     │ (year/prov  │     │ (3 tiers +  │
//! │             │     │  exclusion) │     │  → average) │     │   tally)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    ▼
//!                                          charts / JSON ◀── WasteReport (immutable)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wastemap::WasteReport;
//!
//! let report = WasteReport::load("data/sipsn_waste.csv")?;
//! println!("{} provinces classified", report.tables().provinces.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Observation, totals, averages, Category)
//! - [`parser`] - Dataset loading, validation and year exclusion
//! - [`transform`] - Aggregation, classification and the start-up pipeline
//! - [`chart`] - SVG chart rendering
//! - [`config`] - Defaults and runtime configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Loading
pub mod parser;

// Aggregation and classification
pub mod transform;

// Rendering
pub mod chart;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{AggregateError, ChartError, LoadError, PipelineError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Category, CategoryCounts, ClassifiedProvince, Observation, ProvinceAverage, YearProvinceTotal,
};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use parser::{
    exclude_incomplete_year, load_bytes, load_file, parse_observations, CleanedObservations,
    LoadedDataset, SourceFormat, EXCLUDED_YEAR,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    categorize, classify, derive_tables, province_averages, tally, yearly_totals, DerivedTables,
    LoadInfo, RowCounts, WasteReport,
};

// =============================================================================
// Re-exports - Charts
// =============================================================================

pub use chart::{render, ChartKind};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::Config;

// Server
pub mod server {
    pub use crate::api::server::{router, serve, start_server, AppState};
}
