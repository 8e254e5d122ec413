//! Futures-style expiration codes
//!
//! CME identifies a contract month by a month letter followed by a two-digit
//! year, e.g. August 2025 is `Q25`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{GoldError, GoldResult};

/// Month letters for January through December
const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// Exchange expiration code (month letter + two-digit year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpirationCode {
    month_letter: char,
    year: u8,
}

impl ExpirationCode {
    /// Parse a `YYYYMM` string such as `"202508"`.
    ///
    /// Any malformed input (wrong length, non-digit year, month outside
    /// `01..=12`) is reported as the same [`GoldError::InvalidExpiration`].
    pub fn from_year_month(raw: &str) -> GoldResult<Self> {
        let raw = raw.trim();
        let invalid = || GoldError::invalid_expiration(raw);

        if raw.len() != 6 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: u8 = raw[2..4].parse().map_err(|_| invalid())?;
        let month: usize = raw[4..].parse().map_err(|_| invalid())?;

        let month_letter = month
            .checked_sub(1)
            .and_then(|idx| MONTH_CODES.get(idx))
            .copied()
            .ok_or_else(invalid)?;

        Ok(Self { month_letter, year })
    }

    /// Month letter (`F` for January ... `Z` for December)
    pub fn month_letter(&self) -> char {
        self.month_letter
    }

    /// Two-digit year (`25` for 2025)
    pub fn year(&self) -> u8 {
        self.year
    }

    /// Calendar month number, 1-based
    pub fn month(&self) -> u32 {
        MONTH_CODES
            .iter()
            .position(|&c| c == self.month_letter)
            .map(|idx| idx as u32 + 1)
            .unwrap_or(0)
    }
}

impl fmt::Display for ExpirationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.month_letter, self.year)
    }
}

/// Convenience: `YYYYMM` straight to the wire string, e.g. `"Q25"`.
pub fn convert_to_expiration_code(raw: &str) -> GoldResult<String> {
    ExpirationCode::from_year_month(raw).map(|code| code.to_string())
}
