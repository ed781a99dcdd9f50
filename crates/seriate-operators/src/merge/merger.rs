//! Per-output-column merge strategies.

use seriate_core::block::Block;
use seriate_core::column::ColumnBuilder;
use seriate_core::error::Result;

use super::cursor::ChildCursor;

/// Addresses one value column of one child operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLocation {
    pub child: usize,
    pub column: usize,
}

impl InputLocation {
    pub const fn new(child: usize, column: usize) -> Self {
        Self { child, column }
    }
}

/// Fills one output column for one batch.
///
/// `times` is the batch's already-materialized output time column; every
/// element satisfies the batch boundary, so implementations only
/// equality-match child row times against it. Implementations advance each
/// cursor's shadow index via `set_shadow_index` and never touch the
/// committed read index: that snapshot is shared by all mergers of the
/// batch and committed once by the operator.
pub trait ColumnMerger {
    fn merge_column(
        &self,
        cursors: &mut [ChildCursor],
        times: &[i64],
        builder: &mut ColumnBuilder,
    ) -> Result<()>;

    /// Input addresses this merger reads, for construction-time checks.
    fn inputs(&self) -> &[InputLocation];
}

/// Skip trailing rows that repeat `t` within one child's block
/// (merge-keep-first for malformed same-timestamp runs).
fn skip_equal(block: &Block, mut idx: usize, t: i64) -> usize {
    let rows = block.position_count();
    while idx < rows && block.timestamp(idx) == t {
        idx += 1;
    }
    idx
}

/// Pass-through merger: exactly one child owns the output column.
pub struct DirectMerger {
    input: [InputLocation; 1],
}

impl DirectMerger {
    pub fn new(input: InputLocation) -> Self {
        Self { input: [input] }
    }
}

impl ColumnMerger for DirectMerger {
    fn merge_column(
        &self,
        cursors: &mut [ChildCursor],
        times: &[i64],
        builder: &mut ColumnBuilder,
    ) -> Result<()> {
        let loc = self.input[0];
        let cursor = &mut cursors[loc.child];
        let mut idx = cursor.read_index();
        match cursor.block() {
            None => {
                for _ in times {
                    builder.append_null();
                }
            }
            Some(block) => {
                let column = block.column(loc.column);
                let rows = block.position_count();
                for &t in times {
                    if idx < rows && block.timestamp(idx) == t {
                        builder.append_from(column, idx)?;
                        idx = skip_equal(block, idx + 1, t);
                    } else {
                        builder.append_null();
                    }
                }
            }
        }
        cursor.set_shadow_index(idx);
        Ok(())
    }

    fn inputs(&self) -> &[InputLocation] {
        &self.input
    }
}

/// Device-aligned merger: the output column may be fed by several
/// children (one per device); a timestamp no child covers is a structural
/// null.
pub struct DeviceAlignedMerger {
    inputs: Vec<InputLocation>,
}

impl DeviceAlignedMerger {
    pub fn new(inputs: Vec<InputLocation>) -> Self {
        Self { inputs }
    }
}

impl ColumnMerger for DeviceAlignedMerger {
    fn merge_column(
        &self,
        cursors: &mut [ChildCursor],
        times: &[i64],
        builder: &mut ColumnBuilder,
    ) -> Result<()> {
        let mut indices: Vec<usize> = self
            .inputs
            .iter()
            .map(|loc| cursors[loc.child].read_index())
            .collect();

        for &t in times {
            let mut written = false;
            for (k, loc) in self.inputs.iter().enumerate() {
                let Some(block) = cursors[loc.child].block() else {
                    continue;
                };
                let idx = indices[k];
                if idx < block.position_count() && block.timestamp(idx) == t {
                    // first matching child in declaration order supplies
                    // the value; later matches are still consumed so their
                    // rows don't outlive the emitted timestamp
                    if !written {
                        builder.append_from(block.column(loc.column), idx)?;
                        written = true;
                    }
                    indices[k] = skip_equal(block, idx + 1, t);
                }
            }
            if !written {
                builder.append_null();
            }
        }

        for (k, loc) in self.inputs.iter().enumerate() {
            cursors[loc.child].set_shadow_index(indices[k]);
        }
        Ok(())
    }

    fn inputs(&self) -> &[InputLocation] {
        &self.inputs
    }
}
