//! Per-side strike collections ready for charting

use serde::{Deserialize, Serialize};

use super::option::{OptionType, StrikeRecord};

/// Calls and puts for one expiration, each ascending by strike
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub calls: Vec<StrikeRecord>,
    pub puts: Vec<StrikeRecord>,
}

impl ChartDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from unordered records, routing each by its side
    pub fn from_records(records: impl IntoIterator<Item = StrikeRecord>) -> Self {
        let mut dataset = Self::new();
        for record in records {
            dataset.push(record);
        }
        dataset.sort();
        dataset
    }

    /// Append without re-sorting; call [`ChartDataset::sort`] afterwards
    pub fn push(&mut self, record: StrikeRecord) {
        match record.side {
            OptionType::Call => self.calls.push(record),
            OptionType::Put => self.puts.push(record),
        }
    }

    /// Stable ascending sort by strike on both sides
    pub fn sort(&mut self) {
        self.calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        self.puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    pub fn side(&self, side: OptionType) -> &[StrikeRecord] {
        match side {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    /// Largest |change| across both sides, 0 when empty
    pub fn max_abs_change(&self) -> f64 {
        self.calls
            .iter()
            .chain(self.puts.iter())
            .map(|r| r.change.abs())
            .fold(0.0, f64::max)
    }

    /// Largest volume on one side, 0 when empty
    pub fn max_volume(&self, side: OptionType) -> f64 {
        self.side(side).iter().map(|r| r.volume).fold(0.0, f64::max)
    }
}
