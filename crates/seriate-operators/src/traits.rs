//! Operator trait + shared execution context.
//!
//! Every node in an operator tree obeys the same cooperative pull
//! contract, so a merge operator can itself be the child of another
//! merge operator.

use thiserror::Error;

use seriate_core::block::Block;
use seriate_core::error::Error as CoreError;
use seriate_core::id::{OperatorId, QueryId};
use seriate_core::ready::Readiness;

#[derive(Debug, Error)]
pub enum OperatorError {
    /// Construction-time wiring error: children, output types, and mergers
    /// disagree in count or addressing. Never raised at runtime.
    #[error("operator construction: {0}")]
    Construction(String),

    /// A column merger failed while assembling one output column.
    #[error("merge failed on output column {index}: {source}")]
    ColumnMerge {
        index: usize,
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type OperatorResult<T> = std::result::Result<T, OperatorError>;

/// Identity of one operator instance, carried for tracing.
#[derive(Debug, Clone)]
pub struct OperatorContext {
    operator_id: OperatorId,
    query_id: QueryId,
    name: &'static str,
}

impl OperatorContext {
    pub fn new(operator_id: OperatorId, query_id: QueryId, name: &'static str) -> Self {
        Self {
            operator_id,
            query_id,
            name,
        }
    }

    pub fn operator_id(&self) -> OperatorId {
        self.operator_id
    }

    pub fn query_id(&self) -> QueryId {
        self.query_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The cooperative pull contract.
///
/// Invariants:
/// - No method blocks on I/O. Suspension is surfaced via `is_ready`; only
///   the external driver waits on the returned handle.
/// - `next` is called only after `is_ready` resolved `Ready`, and must
///   finish within a bounded CPU budget over already-buffered data.
/// - `next` returning `Ok(None)` means "no output this call, retry later".
///   An empty block means "zero rows, still alive". Neither implies
///   completion; `is_done` is the only completion signal.
pub trait Operator {
    fn context(&self) -> &OperatorContext;

    /// Whether a `next` call could currently produce data. Must not pull.
    fn is_ready(&mut self) -> OperatorResult<Readiness>;

    fn next(&mut self) -> OperatorResult<Option<Block>>;

    fn has_next(&mut self) -> OperatorResult<bool>;

    /// Latched completion: once this returns true it keeps returning true.
    fn is_done(&mut self) -> bool;

    /// Release resources, children included. Idempotent; keeps releasing
    /// remaining children after a failure and reports the first one.
    fn close(&mut self) -> OperatorResult<()>;
}
