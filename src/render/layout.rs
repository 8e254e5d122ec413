//! Chart geometry in data coordinates
//!
//! Everything the figure and the viewer draw is decided here, so the choice
//! of axis ranges, ticks and value labels can be tested without pixels.

use serde::{Deserialize, Serialize};

use super::config::ChartConfig;
use crate::core::{ChartDataset, OptionType, StrikeBounds};

/// Closed axis interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range symmetric around zero
    pub fn symmetric(limit: f64) -> Self {
        Self::new(-limit, limit)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` as a fraction of the span
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }
}

/// Which end of the value label text touches the bar end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelAnchor {
    /// Text starts at the bar end and runs right
    Left,
    /// Text ends at the bar end
    Right,
}

/// Value label attached to a bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLabel {
    pub text: String,
    pub anchor: LabelAnchor,
}

/// One horizontal change bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGlyph {
    pub strike: f64,
    pub change: f64,
    pub label: Option<ChangeLabel>,
}

/// Everything drawn inside one panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    pub side: OptionType,
    pub bars: Vec<BarGlyph>,
    /// `[volume, strike]` points, ascending by strike
    pub volume_points: Vec<[f64; 2]>,
    /// Secondary (top) horizontal axis for volume
    pub volume_axis: AxisRange,
    pub volume_ticks: Vec<f64>,
}

impl PanelLayout {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Full two-panel chart layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub title: String,
    /// Shared horizontal change axis
    pub change_axis: AxisRange,
    pub change_ticks: Vec<f64>,
    /// Shared vertical strike axis
    pub strike_axis: AxisRange,
    pub strike_ticks: Vec<f64>,
    pub calls: PanelLayout,
    pub puts: PanelLayout,
}

impl ChartLayout {
    /// Lay out `dataset` for the requested bounds and `YYYYMM` expiry
    pub fn build(
        dataset: &ChartDataset,
        bounds: &StrikeBounds,
        raw_expiry: &str,
        config: &ChartConfig,
    ) -> Self {
        let limit = change_limit(dataset.max_abs_change(), config);
        let change_axis = AxisRange::symmetric(limit);
        let strike_axis = strike_range(bounds, config.strike_tick);

        Self {
            title: chart_title(raw_expiry),
            change_axis,
            change_ticks: major_ticks(&change_axis, config.change_tick),
            strike_axis,
            strike_ticks: major_ticks(&strike_axis, config.strike_tick),
            calls: panel_layout(dataset, OptionType::Call, config),
            puts: panel_layout(dataset, OptionType::Put, config),
        }
    }

    /// Panels left to right
    pub fn panels(&self) -> [&PanelLayout; 2] {
        [&self.calls, &self.puts]
    }
}

/// `Gold option <YYYYMM> option chart`
pub fn chart_title(raw_expiry: &str) -> String {
    format!("Gold option {} option chart", raw_expiry.trim())
}

/// Half-width of the change axis: at least the configured minimum,
/// otherwise the largest |change| with headroom, truncated to a whole number
pub fn change_limit(max_abs_change: f64, config: &ChartConfig) -> f64 {
    (max_abs_change * config.change_headroom)
        .trunc()
        .max(config.min_change_limit)
}

/// Vertical range is exactly the bounds unless they collapse to a point
fn strike_range(bounds: &StrikeBounds, strike_tick: f64) -> AxisRange {
    if bounds.span() > 0.0 {
        AxisRange::new(bounds.low, bounds.high)
    } else {
        let pad = strike_tick / 2.0;
        AxisRange::new(bounds.low - pad, bounds.low + pad)
    }
}

/// Most ticks one axis will carry
pub const MAX_TICKS: usize = 1000;

/// Multiples of `step` inside `range`
///
/// When `step` would give more than [`MAX_TICKS`] ticks a coarser 1/2/5 step
/// is used instead. Non-finite ranges get no ticks.
pub fn major_ticks(range: &AxisRange, step: f64) -> Vec<f64> {
    let span = range.span();
    if step <= 0.0 || !step.is_finite() || !span.is_finite() || span < 0.0 {
        return Vec::new();
    }
    if span / step > MAX_TICKS as f64 {
        let coarse = nice_step(span, 10);
        if span / coarse > MAX_TICKS as f64 {
            return Vec::new();
        }
        return major_ticks(range, coarse);
    }

    let first = (range.min / step).ceil() as i64;
    let last = (range.max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// A 1/2/5 x 10^k step giving roughly `target` intervals over `span`
pub fn nice_step(span: f64, target: usize) -> f64 {
    if span <= 0.0 || !span.is_finite() || target == 0 {
        return 1.0;
    }

    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Value label for a bar, if its magnitude clears the threshold
pub fn change_label(side: OptionType, change: f64, threshold: f64) -> Option<ChangeLabel> {
    if change.abs() <= threshold {
        return None;
    }

    let anchor = match (side, change > 0.0) {
        (OptionType::Call, true) | (OptionType::Put, false) => LabelAnchor::Left,
        (OptionType::Call, false) | (OptionType::Put, true) => LabelAnchor::Right,
    };

    Some(ChangeLabel {
        text: format!("{:+.1}", change),
        anchor,
    })
}

fn panel_layout(dataset: &ChartDataset, side: OptionType, config: &ChartConfig) -> PanelLayout {
    let records = dataset.side(side);

    let bars = records
        .iter()
        .map(|r| BarGlyph {
            strike: r.strike,
            change: r.change,
            label: change_label(side, r.change, config.label_threshold),
        })
        .collect();

    let volume_points = records.iter().map(|r| [r.volume, r.strike]).collect();

    let max_volume = dataset.max_volume(side);
    let step = nice_step(max_volume.max(1.0), 5);
    let upper = ((max_volume * 1.05) / step).ceil().max(1.0) * step;
    let volume_axis = AxisRange::new(0.0, upper);

    PanelLayout {
        side,
        bars,
        volume_points,
        volume_ticks: major_ticks(&volume_axis, step),
        volume_axis,
    }
}

/// Tick text: whole numbers without decimals, others with up to two
pub fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value.round())
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
