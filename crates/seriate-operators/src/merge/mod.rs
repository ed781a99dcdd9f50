//! Time-aligning multi-child merge.
//!
//! Pulls blocks opportunistically from N time-sorted children, keeps the
//! pending timestamps in a `TimeSelector`, picks the batch boundary from
//! the most restrictive buffered block, and has one `ColumnMerger` per
//! output column assemble the batch.

mod comparator;
mod cursor;
mod merger;
mod selector;

pub use comparator::MergeOrder;
pub use cursor::ChildCursor;
pub use merger::{ColumnMerger, DeviceAlignedMerger, DirectMerger, InputLocation};
pub use selector::TimeSelector;

use tracing::{debug, trace};

use seriate_core::block::{Block, BlockBuilder};
use seriate_core::error::Error as CoreError;
use seriate_core::ready::Readiness;
use seriate_core::schema::DataType;

use crate::traits::{Operator, OperatorContext, OperatorError, OperatorResult};

/// Joins N individually time-sorted child streams into one
/// time-synchronized stream.
///
/// Composable: implements the same contract it consumes, so a merge can be
/// the child of another merge.
pub struct TimeMergeOperator {
    ctx: OperatorContext,
    children: Vec<Box<dyn Operator>>,
    cursors: Vec<ChildCursor>,
    selector: TimeSelector,
    order: MergeOrder,
    output_types: Vec<DataType>,
    mergers: Vec<Box<dyn ColumnMerger>>,
    /// Latched once all children are exhausted and all buffers consumed.
    done: bool,
    closed: bool,
}

impl TimeMergeOperator {
    /// Wire up the operator. Children, output types, and mergers must be
    /// mutually consistent; violations surface here, never at runtime.
    pub fn new(
        ctx: OperatorContext,
        children: Vec<Box<dyn Operator>>,
        order: MergeOrder,
        output_types: Vec<DataType>,
        mergers: Vec<Box<dyn ColumnMerger>>,
    ) -> OperatorResult<Self> {
        if children.is_empty() {
            return Err(OperatorError::Construction(
                "merge requires at least one child".into(),
            ));
        }
        if output_types.len() != mergers.len() {
            return Err(OperatorError::Construction(format!(
                "{} output columns but {} mergers",
                output_types.len(),
                mergers.len()
            )));
        }
        for (i, merger) in mergers.iter().enumerate() {
            for loc in merger.inputs() {
                if loc.child >= children.len() {
                    return Err(OperatorError::Construction(format!(
                        "merger for output column {} references child {}, but only {} children exist",
                        i,
                        loc.child,
                        children.len()
                    )));
                }
            }
        }

        let cursors = (0..children.len()).map(|_| ChildCursor::new()).collect();
        let selector = TimeSelector::with_capacity(order, children.len() * 2);
        Ok(Self {
            ctx,
            children,
            cursors,
            selector,
            order,
            output_types,
            mergers,
            done: false,
            closed: false,
        })
    }
}

impl Operator for TimeMergeOperator {
    fn context(&self) -> &OperatorContext {
        &self.ctx
    }

    /// Ready only when every child that may still produce data and has an
    /// empty buffer is itself ready. The first pending child's wake handle
    /// is propagated so the driver waits on the actual stall, and nothing
    /// is pulled here.
    fn is_ready(&mut self) -> OperatorResult<Readiness> {
        for (child, cursor) in self.children.iter_mut().zip(&self.cursors) {
            if !cursor.is_exhausted() && cursor.is_consumed() {
                if let Readiness::Pending(signal) = child.is_ready()? {
                    return Ok(Readiness::Pending(signal));
                }
            }
        }
        Ok(Readiness::Ready)
    }

    fn next(&mut self) -> OperatorResult<Option<Block>> {
        let mut builder = BlockBuilder::new(&self.output_types);
        // end time for the batch: the most restrictive end-time among the
        // buffered child blocks, in scan order
        let mut boundary: Option<i64> = None;

        for i in 0..self.children.len() {
            if !self.cursors[i].is_exhausted() && self.cursors[i].is_consumed() {
                if self.children[i].has_next()? {
                    match self.children[i].next()? {
                        Some(block) if !block.is_empty() => {
                            for row in 0..block.position_count() {
                                self.selector.add(block.timestamp(row));
                            }
                            self.cursors[i].stage(block);
                        }
                        _ => {
                            // The child has more data but produced none
                            // inside its time slice. Nothing was consumed
                            // or committed, so the retry starts from the
                            // same state; looping on the child here would
                            // blow the bounded-CPU contract of this call.
                            trace!(child = i, "child yielded without rows");
                            return Ok(None);
                        }
                    }
                } else {
                    debug!(child = i, "child exhausted");
                    self.cursors[i].mark_exhausted();
                }
            }
            if let Some(end) = self.cursors[i].end_time() {
                boundary = Some(match boundary {
                    None => end,
                    Some(b) => self.order.pick_boundary(b, end),
                });
            }
        }

        if self.selector.is_empty() {
            return Ok(Some(Block::empty(&self.output_types)));
        }
        let boundary = boundary
            .ok_or_else(|| CoreError::invariant("pending timestamps with no buffered blocks"))?;

        // materialize the output time column: selector order is global
        // scan order, boundary guarantees no child can later report a
        // timestamp in between
        let mut times = Vec::new();
        while let Some(t) = self.selector.peek_first() {
            if !self.order.within_boundary(t, boundary) {
                break;
            }
            let t = self
                .selector
                .poll_first()
                .ok_or_else(|| CoreError::invariant("selector drained between peek and poll"))?;
            builder.append_timestamp(t);
            times.push(t);
        }

        // every merger starts from the committed read indices; shadows are
        // committed in one step after the last merger so column order
        // cannot skew the snapshot
        for cursor in &mut self.cursors {
            cursor.begin_pass();
        }
        for (i, merger) in self.mergers.iter().enumerate() {
            merger
                .merge_column(&mut self.cursors, &times, builder.column_builder(i))
                .map_err(|source| OperatorError::ColumnMerge { index: i, source })?;
        }
        for cursor in &mut self.cursors {
            cursor.commit();
        }

        trace!(rows = times.len(), boundary, "assembled merge batch");
        Ok(Some(builder.build()?))
    }

    fn has_next(&mut self) -> OperatorResult<bool> {
        if self.done {
            return Ok(false);
        }
        for (child, cursor) in self.children.iter_mut().zip(self.cursors.iter_mut()) {
            if !cursor.is_consumed() {
                return Ok(true);
            }
            if !cursor.is_exhausted() {
                if child.has_next()? {
                    return Ok(true);
                }
                cursor.mark_exhausted();
            }
        }
        Ok(false)
    }

    fn is_done(&mut self) -> bool {
        if self.done {
            return true;
        }
        self.done = self
            .cursors
            .iter()
            .all(|c| c.is_exhausted() && c.is_consumed());
        self.done
    }

    fn close(&mut self) -> OperatorResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut first_failure = None;
        for child in &mut self.children {
            if let Err(e) = child.close() {
                if first_failure.is_none() {
                    first_failure = Some(e);
                } else {
                    tracing::warn!(error = %e, "suppressed close failure");
                }
            }
        }
        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
