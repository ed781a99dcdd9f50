//! Logical value types for time-series columns. Pure data.
//!
//! The time column is always `i64` epoch timestamps and is not listed here;
//! only value columns carry a `DataType`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    Text,
}
