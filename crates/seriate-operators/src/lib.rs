#![forbid(unsafe_code)]
//! seriate-operators: the cooperative operator contract and the
//! time-aligning merge operator with its selector/merger strategies.
//!
//! Design intent:
//! - Keep this crate synchronous. Suspension is surfaced through
//!   `Readiness` handles and awaited by the external driver, never here.
//! - Operators own their children; blocks are handed over by value, one
//!   owner at a time.

pub mod merge;
pub mod source;
pub mod traits;

pub use merge::{
    ColumnMerger, DeviceAlignedMerger, DirectMerger, InputLocation, MergeOrder, TimeMergeOperator,
    TimeSelector,
};
pub use source::BlockSourceOperator;
pub use traits::{Operator, OperatorContext, OperatorError, OperatorResult};
