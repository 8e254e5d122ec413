//! Data fetching
//!
//! Handles:
//! - CME Group volume report for gold options
//! - Partitioning the raw report into per-side strike records

pub mod cme;
pub mod partition;

pub use cme::*;
pub use partition::*;
