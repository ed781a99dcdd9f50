//! Convenient re-exports for downstream crates.

pub use crate::block::{Block, BlockBuilder};
pub use crate::column::{Column, ColumnBuilder};
pub use crate::config::EngineConfig;
pub use crate::error::{Error, Result};
pub use crate::id::{OperatorId, QueryId};
pub use crate::ready::{Readiness, WakeSignal};
pub use crate::schema::DataType;
pub use crate::value::Value;
