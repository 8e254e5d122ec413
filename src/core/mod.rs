//! Core data types for the gold options chart
//!
//! Defines fundamental types:
//! - ExpirationCode: CME month letter + two-digit year
//! - OptionType / StrikeRecord: one strike's change and volume per side
//! - ChartDataset: calls and puts ordered by strike
//! - Numeric coercion for loosely typed payload fields

pub mod dataset;
pub mod error;
pub mod expiration;
pub mod numeric;
pub mod option;

pub use dataset::*;
pub use error::*;
pub use expiration::*;
pub use numeric::*;
pub use option::*;
