//! Option side and per-strike volume records

use serde::{Deserialize, Serialize};

use super::error::{GoldError, GoldResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Route a CME `monthID` such as `"OG Q25-Calls"` to a side.
    ///
    /// Anything not ending in `-Calls` or `-Puts` belongs to neither side.
    pub fn from_month_id(month_id: &str) -> Option<Self> {
        if month_id.ends_with("-Calls") {
            Some(OptionType::Call)
        } else if month_id.ends_with("-Puts") {
            Some(OptionType::Put)
        } else {
            None
        }
    }

    /// Panel title
    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "Calls",
            OptionType::Put => "Puts",
        }
    }
}

/// Inclusive strike range requested by the operator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeBounds {
    pub low: f64,
    pub high: f64,
}

impl StrikeBounds {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Bounds from operator input; both ends must be finite
    pub fn checked(low: f64, high: f64) -> GoldResult<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(GoldError::invalid_input(format!(
                "Strike bounds must be finite numbers, got {} and {}",
                low, high
            )));
        }
        Ok(Self::new(low, high))
    }

    /// Inclusive on both ends
    pub fn contains(&self, strike: f64) -> bool {
        self.low <= strike && strike <= self.high
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }
}

/// One strike's change and volume for a single side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeRecord {
    /// Strike price
    pub strike: f64,
    /// Day-over-day change, drawn as a bar
    pub change: f64,
    /// Total volume at this strike, drawn as a line
    pub volume: f64,
    /// Call or Put
    pub side: OptionType,
}

impl StrikeRecord {
    pub fn new(strike: f64, change: f64, volume: f64, side: OptionType) -> Self {
        Self {
            strike,
            change,
            volume,
            side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_routing() {
        assert_eq!(OptionType::from_month_id("OG Q25-Calls"), Some(OptionType::Call));
        assert_eq!(OptionType::from_month_id("OG Q25-Puts"), Some(OptionType::Put));
        assert_eq!(OptionType::from_month_id("OG Q25-Calls-Weekly"), None);
        assert_eq!(OptionType::from_month_id("-calls"), None);
        assert_eq!(OptionType::from_month_id(""), None);
    }

    #[test]
    fn test_bounds_inclusive() {
        let bounds = StrikeBounds::new(3300.0, 3400.0);
        assert!(bounds.contains(3300.0));
        assert!(bounds.contains(3400.0));
        assert!(!bounds.contains(3299.0));
        assert!(!bounds.contains(3401.0));
        assert_eq!(bounds.span(), 100.0);
    }

    #[test]
    fn test_bounds_must_be_finite() {
        assert!(StrikeBounds::checked(3300.0, 1e300).is_ok());
        assert!(matches!(
            StrikeBounds::checked(f64::NEG_INFINITY, f64::INFINITY),
            Err(GoldError::InvalidInput(_))
        ));
        assert!(StrikeBounds::checked(3300.0, f64::NAN).is_err());
    }
}
