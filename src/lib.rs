//! # Gold Options - CME Volume/Change Chart
//!
//! Fetches the COMEX gold options volume report from CME Group for one
//! expiration month and charts it as two panels, Calls on the left and Puts
//! on the right: a horizontal bar per strike for the day's change and a line
//! with markers for open volume.
//!
//! ## Pipeline
//!
//! 1. **Input**: strike bounds and a `YYYYMM` expiry, converted to a CME
//!    expiration code (`202508` -> `Q25`)
//! 2. **Retrieval**: one blocking GET against the CME volume report
//! 3. **Partition**: nested `monthData[].strikeData[]` records filtered to the
//!    strike bounds and split by side, with a per-record outcome for anything
//!    dropped
//! 4. **Render**: layout computed in data space, rasterised to
//!    `gold_options_<YYYYMMDD>.png`, then shown in a window
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gold_options::prelude::*;
//!
//! let code = ExpirationCode::from_year_month("202508").unwrap();
//! let client = CmeClient::new().unwrap();
//! let today = chrono::Local::now().date_naive();
//! let payload = client.fetch_option_data(&code, previous_trade_date(today)).unwrap();
//!
//! let bounds = StrikeBounds::new(3300.0, 3500.0);
//! let report = partition_report(&payload, &bounds);
//!
//! let config = ChartConfig::default();
//! let layout = ChartLayout::build(&report.dataset, &bounds, "202508", &config);
//! save_chart(&layout, &config, std::path::Path::new("."), today).unwrap();
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Store or compare historical reports
//! - Poll, schedule or alert
//! - Retry failed requests

pub mod console;
pub mod core;
pub mod data;
pub mod render;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        coerce_number, convert_to_expiration_code, parse_float, ChartDataset, ExpirationCode,
        GoldError, GoldResult, OptionType, StrikeBounds, StrikeRecord,
    };

    // Data fetching and partitioning
    pub use crate::data::{
        classify_record, format_trade_date, parse_trade_date, partition_report,
        previous_trade_date, CmeClient, FetchConfig, PartitionReport, RecordOutcome,
        RecordReport, SkipReason,
    };

    // Rendering
    pub use crate::render::{
        chart_file_name, render_chart, save_chart, Axes, ChartConfig, ChartLayout, Figure,
        Palette, PanelLayout,
    };
}

// Re-export main types at crate root
pub use crate::core::{GoldError, GoldResult};
