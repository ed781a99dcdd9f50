//! Immutable columnar batch: one time column plus N value columns.
//!
//! A `Block` is built once by a `BlockBuilder` and never mutated after it
//! is handed to a consumer. Within a block the time column is sorted in
//! the producing operator's scan order (ascending or descending).

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnBuilder};
use crate::error::{Error, Result};
use crate::schema::DataType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    timestamps: Vec<i64>,
    columns: Vec<Column>,
}

impl Block {
    /// Assemble a block from a finished time column and value columns.
    /// Every value column must match the time column's length.
    pub fn new(timestamps: Vec<i64>, columns: Vec<Column>) -> Result<Self> {
        let rows = timestamps.len();
        for (i, col) in columns.iter().enumerate() {
            if col.len() != rows {
                return Err(Error::invariant(format!(
                    "value column {} holds {} rows, time column holds {}",
                    i,
                    col.len(),
                    rows
                )));
            }
        }
        Ok(Self {
            timestamps,
            columns,
        })
    }

    /// The valid zero-row block: "no rows this batch, but not done".
    pub fn empty(types: &[DataType]) -> Self {
        Self {
            timestamps: Vec::new(),
            columns: types
                .iter()
                .map(|&t| ColumnBuilder::new(t).finish())
                .collect(),
        }
    }

    pub fn position_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamp(&self, row: usize) -> i64 {
        self.timestamps[row]
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn start_time(&self) -> Option<i64> {
        self.timestamps.first().copied()
    }

    /// Timestamp of the last row: the furthest time this block covers in
    /// its scan order.
    pub fn end_time(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }

    pub fn column(&self, i: usize) -> &Column {
        &self.columns[i]
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Builds one `Block`. Constructed fresh for every output batch; partial
/// state never carries over between batches.
#[derive(Debug)]
pub struct BlockBuilder {
    timestamps: Vec<i64>,
    builders: Vec<ColumnBuilder>,
}

impl BlockBuilder {
    pub fn new(types: &[DataType]) -> Self {
        Self {
            timestamps: Vec::new(),
            builders: types.iter().map(|&t| ColumnBuilder::new(t)).collect(),
        }
    }

    /// Declare one output row at `t`. Value cells for the row are appended
    /// through `column_builder`.
    pub fn append_timestamp(&mut self, t: i64) {
        self.timestamps.push(t);
    }

    pub fn column_builder(&mut self, i: usize) -> &mut ColumnBuilder {
        &mut self.builders[i]
    }

    pub fn column_count(&self) -> usize {
        self.builders.len()
    }

    pub fn position_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Finish the batch. Every value column must have received exactly one
    /// cell per declared row.
    pub fn build(self) -> Result<Block> {
        let rows = self.timestamps.len();
        for (i, b) in self.builders.iter().enumerate() {
            if b.len() != rows {
                return Err(Error::invariant(format!(
                    "output column {} received {} cells for {} declared rows",
                    i,
                    b.len(),
                    rows
                )));
            }
        }
        Ok(Block {
            timestamps: self.timestamps,
            columns: self.builders.into_iter().map(|b| b.finish()).collect(),
        })
    }
}
