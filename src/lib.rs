#![forbid(unsafe_code)]
//! Umbrella crate for the seriate engine workspace.
//!
//! Re-exports the public surface of the member crates; integration tests
//! and benches live here.

pub use seriate_core::prelude::*;
pub use seriate_exec::{DriveError, Driver, DriverMetrics};
pub use seriate_operators::{
    BlockSourceOperator, ColumnMerger, DeviceAlignedMerger, DirectMerger, InputLocation,
    MergeOrder, Operator, OperatorContext, OperatorError, TimeMergeOperator, TimeSelector,
};
