//! HTTP API module.
//!
//! This module provides the HTTP server, the JSON response types and the
//! HTML pages for the waste charts.

pub mod page;
pub mod server;
pub mod types;

pub use server::{router, serve, start_server, AppState};
pub use types::*;
