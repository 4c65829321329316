//! Runtime configuration.
//!
//! Defaults are constants; the CLI overrides them from flags or from the
//! environment (a `.env` file is read at start-up).

use std::path::PathBuf;

/// Environment variable naming the dataset file.
pub const DATA_ENV: &str = "WASTEMAP_DATA";

/// Environment variable for the HTTP port.
pub const PORT_ENV: &str = "WASTEMAP_PORT";

/// Environment variable listing the provinces of the focused trend chart.
pub const HIGHLIGHT_ENV: &str = "WASTEMAP_HIGHLIGHT";

/// Dataset used when nothing else is configured.
pub const DEFAULT_DATA_PATH: &str = "data/sipsn_waste.csv";

/// HTTP port used when nothing else is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Provinces shown by the focused trend chart.
pub const DEFAULT_HIGHLIGHT: [&str; 3] = ["Jawa Barat", "Jawa Tengah", "Jawa Timur"];

/// Trend chart size in pixels.
pub const LINE_CHART_SIZE: (u32, u32) = (1200, 800);

/// Bar chart size in pixels.
pub const BAR_CHART_SIZE: (u32, u32) = (1000, 600);

/// Resolved configuration for one process.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub highlight: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
            highlight: DEFAULT_HIGHLIGHT.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Config {
    /// Replace the highlighted provinces when a list is given.
    pub fn with_highlight(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            self.highlight = parse_province_list(raw);
        }
        self
    }
}

/// Split a comma-separated province list, dropping blanks.
pub fn parse_province_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
