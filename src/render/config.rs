//! Configuration for chart rendering

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{GoldError, GoldResult};

/// Highest accepted output resolution (18 x 10 in at 1200 dpi is 21600 x 12000 px)
pub const MAX_DPI: f64 = 1200.0;

/// Colors as RGB triples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Figure and calls panel background
    pub background: [u8; 3],
    /// Puts panel background
    pub right_panel: [u8; 3],
    /// Change bars
    pub bar: [u8; 3],
    /// Volume line and markers
    pub line: [u8; 3],
    /// Titles, labels, ticks, spines
    pub text: [u8; 3],
    /// Dotted grid
    pub grid: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [0x21, 0x2F, 0x3C],
            right_panel: [0x18, 0x1D, 0x29],
            bar: [0x00, 0xFF, 0x8C],
            line: [0x4B, 0x7D, 0xB0],
            text: [0xFF, 0xFF, 0xFF],
            grid: [0x34, 0x49, 0x5E],
        }
    }
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Figure size in inches (width, height)
    /// Default: 18 x 10
    pub figure_size: (f64, f64),

    /// Output resolution
    /// Default: 300
    pub dpi: f64,

    pub palette: Palette,

    /// Opacity of change bars
    pub bar_alpha: f64,
    /// Opacity of the volume line
    pub line_alpha: f64,
    /// Opacity of grid lines
    pub grid_alpha: f64,

    /// |change| must exceed this for the bar to get a value label
    /// Default: 5
    pub label_threshold: f64,

    /// Smallest half-width of the change axis
    /// Default: 600
    pub min_change_limit: f64,

    /// Change axis half-width as a multiple of the largest |change|
    /// Default: 1.1
    pub change_headroom: f64,

    /// Major tick interval on the change axis
    pub change_tick: f64,

    /// Major tick interval on the strike axis
    /// Default: 20
    pub strike_tick: f64,

    /// Bar thickness in strike units
    pub bar_height: f64,

    /// Font sizes in points
    pub title_font_pt: f64,
    pub panel_title_font_pt: f64,
    pub axis_label_font_pt: f64,
    pub tick_font_pt: f64,
    pub value_label_font_pt: f64,

    /// Volume line width in points
    pub line_width_pt: f64,
    /// Volume marker diameter in points
    pub marker_size_pt: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            figure_size: (18.0, 10.0),
            dpi: 300.0,
            palette: Palette::default(),
            bar_alpha: 0.8,
            line_alpha: 0.8,
            grid_alpha: 0.3,
            label_threshold: 5.0,
            min_change_limit: 600.0,
            change_headroom: 1.1,
            change_tick: 100.0,
            strike_tick: 20.0,
            bar_height: 3.0,
            title_font_pt: 16.0,
            panel_title_font_pt: 14.0,
            axis_label_font_pt: 10.0,
            tick_font_pt: 10.0,
            value_label_font_pt: 8.0,
            line_width_pt: 2.0,
            marker_size_pt: 5.0,
        }
    }
}

impl ChartConfig {
    /// Same chart at a different resolution
    pub fn with_dpi(dpi: f64) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }

    /// Like [`ChartConfig::with_dpi`], rejecting resolutions outside `(0, MAX_DPI]`
    pub fn checked_dpi(dpi: f64) -> GoldResult<Self> {
        if !dpi.is_finite() || dpi <= 0.0 || dpi > MAX_DPI {
            return Err(GoldError::invalid_input(format!(
                "dpi must be above 0 and at most {}, got {}",
                MAX_DPI, dpi
            )));
        }
        Ok(Self::with_dpi(dpi))
    }

    /// Output size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_size;
        (
            (w * self.dpi).round().max(1.0) as u32,
            (h * self.dpi).round().max(1.0) as u32,
        )
    }

    /// Points to pixels at the configured resolution
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }
}

/// `gold_options_YYYYMMDD.png` for the run date
pub fn chart_file_name(run_date: NaiveDate) -> String {
    format!("gold_options_{}.png", run_date.format("%Y%m%d"))
}
