//! MBTA V3 API access.

pub mod client;

pub use client::MbtaClient;
