#![forbid(unsafe_code)]
//! seriate-exec: the cooperative driver loop and its metrics.
//!
//! Operators never wait; the driver is the single place a query-tree
//! instance parks while a leaf cannot produce data.

pub mod driver;
pub mod metrics;

pub use driver::{DriveError, Driver};
pub use metrics::DriverMetrics;
