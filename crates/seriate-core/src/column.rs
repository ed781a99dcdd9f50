//! Typed columnar storage with per-row null flags.
//!
//! A `Column` is immutable once built. Nulls are tracked in a separate
//! flag vector; the typed storage keeps a placeholder slot for each null
//! row so row indices stay aligned across the data and the flags.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DataType;
use crate::value::Value;

/// Backing storage for one value column.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum ColumnData {
    Boolean(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    fn with_capacity(data_type: DataType, cap: usize) -> Self {
        match data_type {
            DataType::Boolean => ColumnData::Boolean(Vec::with_capacity(cap)),
            DataType::Int32 => ColumnData::Int32(Vec::with_capacity(cap)),
            DataType::Int64 => ColumnData::Int64(Vec::with_capacity(cap)),
            DataType::Float => ColumnData::Float(Vec::with_capacity(cap)),
            DataType::Double => ColumnData::Double(Vec::with_capacity(cap)),
            DataType::Text => ColumnData::Text(Vec::with_capacity(cap)),
        }
    }

    fn data_type(&self) -> DataType {
        match self {
            ColumnData::Boolean(_) => DataType::Boolean,
            ColumnData::Int32(_) => DataType::Int32,
            ColumnData::Int64(_) => DataType::Int64,
            ColumnData::Float(_) => DataType::Float,
            ColumnData::Double(_) => DataType::Double,
            ColumnData::Text(_) => DataType::Text,
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Int32(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    fn value(&self, row: usize) -> Value {
        match self {
            ColumnData::Boolean(v) => Value::Boolean(v[row]),
            ColumnData::Int32(v) => Value::Int32(v[row]),
            ColumnData::Int64(v) => Value::Int64(v[row]),
            ColumnData::Float(v) => Value::Float(v[row]),
            ColumnData::Double(v) => Value::Double(v[row]),
            ColumnData::Text(v) => Value::Text(v[row].clone()),
        }
    }

    fn push(&mut self, value: Value) -> Result<()> {
        match (self, value) {
            (ColumnData::Boolean(v), Value::Boolean(x)) => v.push(x),
            (ColumnData::Int32(v), Value::Int32(x)) => v.push(x),
            (ColumnData::Int64(v), Value::Int64(x)) => v.push(x),
            (ColumnData::Float(v), Value::Float(x)) => v.push(x),
            (ColumnData::Double(v), Value::Double(x)) => v.push(x),
            (ColumnData::Text(v), Value::Text(x)) => v.push(x),
            (data, value) => {
                return Err(Error::SchemaMismatch {
                    expected: data.data_type(),
                    // `Null` never reaches here; `ColumnBuilder::append_value`
                    // routes it to `append_null`.
                    found: value.data_type().unwrap_or(data.data_type()),
                });
            }
        }
        Ok(())
    }

    /// Placeholder slot kept under a null flag so indices stay aligned.
    fn push_default(&mut self) {
        match self {
            ColumnData::Boolean(v) => v.push(false),
            ColumnData::Int32(v) => v.push(0),
            ColumnData::Int64(v) => v.push(0),
            ColumnData::Float(v) => v.push(0.0),
            ColumnData::Double(v) => v.push(0.0),
            ColumnData::Text(v) => v.push(String::new()),
        }
    }
}

/// Immutable value column: typed storage plus one null flag per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    data: ColumnData,
    nulls: Vec<bool>,
}

impl Column {
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    pub fn len(&self) -> usize {
        self.nulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nulls.is_empty()
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.nulls[row]
    }

    /// Cell value at `row`; `Value::Null` when the null flag is set.
    pub fn value(&self, row: usize) -> Value {
        if self.nulls[row] {
            Value::Null
        } else {
            self.data.value(row)
        }
    }
}

/// Append-only builder fixed to one `DataType` at construction.
#[derive(Debug)]
pub struct ColumnBuilder {
    data: ColumnData,
    nulls: Vec<bool>,
}

impl ColumnBuilder {
    pub fn new(data_type: DataType) -> Self {
        Self::with_capacity(data_type, 0)
    }

    pub fn with_capacity(data_type: DataType, cap: usize) -> Self {
        Self {
            data: ColumnData::with_capacity(data_type, cap),
            nulls: Vec::with_capacity(cap),
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    pub fn len(&self) -> usize {
        self.nulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nulls.is_empty()
    }

    pub fn append_null(&mut self) {
        self.data.push_default();
        self.nulls.push(true);
    }

    /// Append one cell. `Value::Null` becomes a null row; a value of any
    /// other type must match the builder's declared type.
    pub fn append_value(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            self.append_null();
            return Ok(());
        }
        self.data.push(value)?;
        self.nulls.push(false);
        Ok(())
    }

    /// Copy the cell at `source[row]`, preserving its null flag.
    ///
    /// The source column's type must match the builder's declared type
    /// even when the copied cell is null.
    pub fn append_from(&mut self, source: &Column, row: usize) -> Result<()> {
        if source.data_type() != self.data_type() {
            return Err(Error::SchemaMismatch {
                expected: self.data_type(),
                found: source.data_type(),
            });
        }
        if source.is_null(row) {
            self.append_null();
        } else {
            self.data.push(source.data.value(row))?;
            self.nulls.push(false);
        }
        Ok(())
    }

    pub fn finish(self) -> Column {
        Column {
            data: self.data,
            nulls: self.nulls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_read_back_with_nulls() {
        let mut b = ColumnBuilder::new(DataType::Int32);
        b.append_value(Value::Int32(7)).expect("append");
        b.append_null();
        b.append_value(Value::Int32(9)).expect("append");
        let col = b.finish();

        assert_eq!(col.len(), 3);
        assert_eq!(col.value(0), Value::Int32(7));
        assert!(col.is_null(1));
        assert_eq!(col.value(1), Value::Null);
        assert_eq!(col.value(2), Value::Int32(9));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut b = ColumnBuilder::new(DataType::Int32);
        let err = b.append_value(Value::Text("x".into())).unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaMismatch {
                expected: DataType::Int32,
                found: DataType::Text,
            }
        ));
    }

    #[test]
    fn append_from_rejects_mismatched_source_even_for_null_cells() {
        let mut src = ColumnBuilder::new(DataType::Double);
        src.append_null();
        let src = src.finish();

        let mut b = ColumnBuilder::new(DataType::Int64);
        let err = b.append_from(&src, 0).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }
}
