// file: src/matrix/model.rs
// description: rectangular matrix value with copy-on-write row, column and element operations
// reference: every operation returns a new matrix and leaves the receiver untouched

use crate::error::{Axis, PipelineError, Result};
use crate::matrix::validator::MatrixValidator;
use serde_json::Value;

/// Rows of equal length. Construction always validates, so every `Matrix` is
/// rectangular. Row count zero is allowed; a matrix may also have rows of
/// width zero after its last column is deleted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: Vec<Vec<Value>>,
}

impl Matrix {
    pub fn new(rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let width = first.len();
            if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
                return Err(PipelineError::InvalidMatrix(format!(
                    "row {} has length {} but row 0 has length {}",
                    i,
                    row.len(),
                    width
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates a JSON value and takes ownership of its rows.
    pub fn from_value(value: Value) -> Result<Self> {
        MatrixValidator::validate(&value)?;
        let rows = match value {
            Value::Array(rows) => rows
                .into_iter()
                .map(|row| match row {
                    Value::Array(cells) => cells,
                    _ => Vec::new(),
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(Self { rows })
    }

    pub fn into_value(self) -> Value {
        Value::Array(self.rows.into_iter().map(Value::Array).collect())
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_row(&self, index: usize) -> Result<Vec<Value>> {
        MatrixValidator::check_position(Axis::Row, index, self.row_count())?;
        Ok(self.rows[index].clone())
    }

    pub fn get_column(&self, index: usize) -> Result<Vec<Value>> {
        MatrixValidator::check_position(Axis::Column, index, self.column_count())?;
        Ok(self.rows.iter().map(|row| row[index].clone()).collect())
    }

    pub fn get_element(&self, row: usize, column: usize) -> Result<Value> {
        MatrixValidator::check_position(Axis::Row, row, self.row_count())?;
        MatrixValidator::check_position(Axis::Column, column, self.column_count())?;
        Ok(self.rows[row][column].clone())
    }

    /// Appends `row`. On a matrix with no rows the new row sets the width.
    pub fn add_row(&self, row: Vec<Value>) -> Result<Matrix> {
        if !self.is_empty() {
            MatrixValidator::check_length("add_row", "row length", self.column_count(), row.len())?;
        }
        let mut rows = self.rows.clone();
        rows.push(row);
        Ok(Matrix { rows })
    }

    pub fn update_row(&self, index: usize, row: Vec<Value>) -> Result<Matrix> {
        MatrixValidator::check_position(Axis::Row, index, self.row_count())?;
        MatrixValidator::check_length("update_row", "row length", self.column_count(), row.len())?;
        let mut rows = self.rows.clone();
        rows[index] = row;
        Ok(Matrix { rows })
    }

    pub fn delete_row(&self, index: usize) -> Result<Matrix> {
        MatrixValidator::check_position(Axis::Row, index, self.row_count())?;
        let mut rows = self.rows.clone();
        rows.remove(index);
        Ok(Matrix { rows })
    }

    /// Appends `column`. On a matrix with no rows the column sets the height.
    pub fn add_column(&self, column: Vec<Value>) -> Result<Matrix> {
        if self.is_empty() {
            return Ok(Matrix {
                rows: column.into_iter().map(|cell| vec![cell]).collect(),
            });
        }

        MatrixValidator::check_length("add_column", "column length", self.row_count(), column.len())?;
        let rows = self
            .rows
            .iter()
            .zip(column)
            .map(|(row, cell)| {
                let mut row = row.clone();
                row.push(cell);
                row
            })
            .collect();
        Ok(Matrix { rows })
    }

    pub fn update_column(&self, index: usize, column: Vec<Value>) -> Result<Matrix> {
        MatrixValidator::check_position(Axis::Column, index, self.column_count())?;
        MatrixValidator::check_length(
            "update_column",
            "column length",
            self.row_count(),
            column.len(),
        )?;
        let rows = self
            .rows
            .iter()
            .zip(column)
            .map(|(row, cell)| {
                let mut row = row.clone();
                row[index] = cell;
                row
            })
            .collect();
        Ok(Matrix { rows })
    }

    pub fn delete_column(&self, index: usize) -> Result<Matrix> {
        MatrixValidator::check_position(Axis::Column, index, self.column_count())?;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.remove(index);
                row
            })
            .collect();
        Ok(Matrix { rows })
    }

    pub fn update_element(&self, row: usize, column: usize, value: Value) -> Result<Matrix> {
        MatrixValidator::check_position(Axis::Row, row, self.row_count())?;
        MatrixValidator::check_position(Axis::Column, column, self.column_count())?;
        let mut rows = self.rows.clone();
        rows[row][column] = value;
        Ok(Matrix { rows })
    }

    pub fn transpose(&self) -> Matrix {
        let rows = (0..self.column_count())
            .map(|j| self.rows.iter().map(|row| row[j].clone()).collect())
            .collect();
        Matrix { rows }
    }
}

impl TryFrom<Value> for Matrix {
    type Error = PipelineError;

    fn try_from(value: Value) -> Result<Self> {
        Matrix::from_value(value)
    }
}

impl From<Matrix> for Value {
    fn from(matrix: Matrix) -> Self {
        matrix.into_value()
    }
}
