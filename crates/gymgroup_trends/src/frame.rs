//! A small ordered-column table for occupancy readings.
//!
//! Just enough of a frame for this pipeline: named columns in insertion
//! order, three cell types, and row-subset and column-replacement helpers
//! that always produce a fresh table. Transformations never mutate a caller's
//! frame.

use crate::error::{TrendError, TrendResult};
use chrono::NaiveDateTime;

#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Datetime(Vec<NaiveDateTime>),
    Float(Vec<f64>),
    Str(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Datetime(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Datetime(v) => Column::Datetime(rows.iter().map(|&i| v[i]).collect()),
            Column::Float(v) => Column::Float(rows.iter().map(|&i| v[i]).collect()),
            Column::Str(v) => Column::Str(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    columns: Vec<(String, Column)>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Columns are expected to share one row count; the
    /// frame's row count is the first column's.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) {
        self.columns.push((name.into(), column));
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// The shared validation preamble of every pipeline function: the named
    /// column must exist and must hold datetimes.
    pub fn datetime_column(&self, name: &str) -> TrendResult<&[NaiveDateTime]> {
        match self.column(name) {
            None => Err(TrendError::ColumnNotFound(name.to_string())),
            Some(Column::Datetime(v)) => Ok(v),
            Some(_) => Err(TrendError::ColumnNotDatetime(name.to_string())),
        }
    }

    pub fn float_column(&self, name: &str) -> TrendResult<&[f64]> {
        match self.column(name) {
            None => Err(TrendError::ColumnNotFound(name.to_string())),
            Some(Column::Float(v)) => Ok(v),
            Some(_) => Err(TrendError::Internal(format!(
                "column '{name}' is not numeric"
            ))),
        }
    }

    /// New frame containing the given rows of every column, in order.
    pub fn take_rows(&self, rows: &[usize]) -> Frame {
        Frame {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.take(rows)))
                .collect(),
        }
    }

    /// New frame with one column swapped out, everything else cloned.
    pub(crate) fn with_replaced(&self, name: &str, column: Column) -> Frame {
        Frame {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| {
                    if n == name {
                        (n.clone(), column.clone())
                    } else {
                        (n.clone(), c.clone())
                    }
                })
                .collect(),
        }
    }
}
