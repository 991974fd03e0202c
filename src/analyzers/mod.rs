//! Headway derivation and per-station summaries.
//!
//! This module turns fetched arrival predictions into the gaps between
//! consecutive vehicles, reduces those gaps to mean, median and standard
//! deviation, and drives that pipeline across every configured station.

pub mod aggregate;
pub mod analyzer;
pub mod headway;
pub mod types;
pub mod utility;
