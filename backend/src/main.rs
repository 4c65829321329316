//! Wastemap CLI - Indonesian waste generation charts
//!
//! ```bash
//! wastemap serve                               # Load the dataset and serve charts (port 3000)
//! wastemap summary --json                      # Print the derived tables
//! wastemap render average_annual_waste -o avg.svg
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wastemap::config::{Config, DATA_ENV, DEFAULT_DATA_PATH, DEFAULT_PORT, HIGHLIGHT_ENV, PORT_ENV};
use wastemap::{ChartKind, WasteReport};

#[derive(Parser)]
#[command(name = "wastemap")]
#[command(about = "Aggregate Indonesian waste generation data and serve tiered charts", long_about = None)]
struct Cli {
    /// Dataset file (CSV export of the SIPSN table)
    #[arg(short, long, global = true, env = DATA_ENV, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Provinces of the focused trend chart (comma-separated)
        #[arg(long, env = HIGHLIGHT_ENV)]
        highlight: Option<String>,
    },

    /// Print the derived tables
    Summary {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render one chart to an SVG file
    Render {
        /// Chart name (e.g. total_annual_waste, average_annual_waste)
        chart: ChartKind,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Provinces for total_annual_waste_specific (comma-separated)
        #[arg(long, env = HIGHLIGHT_ENV)]
        provinces: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port, highlight } => cmd_serve(&cli.data, port, highlight).await,
        Commands::Summary { json } => cmd_summary(&cli.data, json),
        Commands::Render {
            chart,
            output,
            provinces,
        } => cmd_render(&cli.data, chart, output.as_deref(), provinces),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn cmd_serve(
    data: &Path,
    port: u16,
    highlight: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config {
        data_path: data.to_path_buf(),
        port,
        ..Config::default()
    }
    .with_highlight(highlight.as_deref());

    wastemap::server::start_server(&config).await?;
    Ok(())
}

fn cmd_summary(data: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = WasteReport::load(data)?;
    let tables = report.tables();

    if json {
        println!("{}", serde_json::to_string_pretty(tables)?);
        return Ok(());
    }

    let info = report.info();
    println!(
        "Rows: {} loaded, {} retained, {} excluded",
        info.raw_rows, info.retained_rows, info.excluded_rows
    );
    if let Some(format) = &info.format {
        println!(
            "Format: {}, delimiter '{}', header [{}]",
            format.encoding,
            format.delimiter.escape_default(),
            format.header.join(" | ")
        );
    }

    println!("\nAverage annual waste by province:");
    for p in &tables.provinces {
        println!(
            "  {:<32} {:>16.2} t  {:>2} yrs  {}",
            p.province, p.average, p.years_covered, p.category
        );
    }

    if !tables.without_data.is_empty() {
        println!("\nNo retained data: {}", tables.without_data.join(", "));
    }

    println!("\nProvinces per category:");
    for (category, count) in tables.counts.entries() {
        println!("  {:<6} {}", category.as_str(), count);
    }
    Ok(())
}

fn cmd_render(
    data: &Path,
    chart: ChartKind,
    output: Option<&Path>,
    provinces: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config {
        data_path: data.to_path_buf(),
        ..Config::default()
    }
    .with_highlight(provinces.as_deref());

    let report = WasteReport::load(&config.data_path)?;
    let svg = wastemap::render(chart, &report, &config.highlight)?;

    match output {
        Some(path) => {
            fs::write(path, &svg)?;
            info!(chart = %chart, path = %path.display(), "chart written");
        }
        None => println!("{}", svg),
    }
    Ok(())
}
