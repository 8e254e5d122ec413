//! Gold Options CLI
//!
//! Prompts for (or takes as flags) a strike range and expiration month,
//! fetches the CME volume report, and charts calls/puts change and volume.

use chrono::Local;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use gold_options::console::{banner, prompt_float, prompt_line};
use gold_options::prelude::*;

#[derive(Parser)]
#[command(name = "gold-options")]
#[command(about = "Chart CME gold options change and volume by strike", long_about = None)]
struct Cli {
    /// Lowest strike to include (prompted when omitted)
    #[arg(long)]
    low: Option<f64>,

    /// Highest strike to include (prompted when omitted)
    #[arg(long)]
    high: Option<f64>,

    /// Expiration year-month, e.g. 202508 (prompted when omitted)
    #[arg(long)]
    expiry: Option<String>,

    /// Report trade date as YYYYMMDD (default: yesterday)
    #[arg(long)]
    trade_date: Option<String>,

    /// CME product id
    #[arg(long, default_value = "192")]
    product_id: String,

    /// CME report type
    #[arg(long, default_value = "P")]
    report_type: String,

    /// Directory for the PNG
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Output resolution
    #[arg(long, default_value = "300")]
    dpi: f64,

    /// Write the PNG without opening the chart window
    #[arg(long)]
    no_show: bool,

    /// Log level when RUST_LOG is unset
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    println!("{}", banner());

    match run(cli) {
        Ok(()) => {
            println!("\n{}", "=".repeat(40));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> GoldResult<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let low = match cli.low {
        Some(v) => v,
        None => prompt_float(&mut input, &mut output, "Lowest strike (XAU/USD): ")?,
    };
    let high = match cli.high {
        Some(v) => v,
        None => prompt_float(&mut input, &mut output, "Highest strike (XAU/USD): ")?,
    };
    let bounds = StrikeBounds::checked(low, high)?;
    let config = ChartConfig::checked_dpi(cli.dpi)?;
    let raw_expiry = match cli.expiry {
        Some(raw) => raw.trim().to_string(),
        None => prompt_line(&mut input, &mut output, "Expiration year-month (e.g. 202508): ")?,
    };

    let code = ExpirationCode::from_year_month(&raw_expiry)?;
    let today = Local::now().date_naive();
    let trade_date = match &cli.trade_date {
        Some(raw) => parse_trade_date(raw)?,
        None => previous_trade_date(today),
    };

    let client = CmeClient::with_config(FetchConfig {
        product_id: cli.product_id,
        report_type: cli.report_type,
        ..Default::default()
    })?;

    println!("\nFetching data, please wait...");
    let payload = client.fetch_option_data(&code, trade_date)?;

    let report = partition_report(&payload, &bounds);
    if report.dataset.is_empty() {
        println!("No option data between strikes {} and {}", low, high);
        return Ok(());
    }

    let layout = ChartLayout::build(&report.dataset, &bounds, &raw_expiry, &config);
    let path = save_chart(&layout, &config, &cli.output_dir, today)?;
    println!("Chart saved to {}", path.display());

    if !cli.no_show {
        show(layout, config, path);
    }
    Ok(())
}

#[cfg(feature = "gui")]
fn show(layout: ChartLayout, config: ChartConfig, path: PathBuf) {
    if let Err(e) = gold_options::render::viewer::show_chart(layout, config, Some(path)) {
        tracing::warn!("Could not open chart window: {}", e);
    }
}

#[cfg(not(feature = "gui"))]
fn show(_layout: ChartLayout, _config: ChartConfig, _path: PathBuf) {
    tracing::info!("Built without the gui feature; chart window skipped");
}
