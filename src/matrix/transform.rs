// file: src/matrix/transform.rs
// description: row filtering, sorting, aggregation and reshaping

use crate::error::{Axis, PipelineError, Result};
use crate::matrix::convert::cell_text;
use crate::matrix::model::Matrix;
use crate::matrix::validator::MatrixValidator;
use crate::pipeline::processor::{FromParams, Params, Processor, kind_of, parse_params};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Orders values by kind first (null, bool, number, string, array, object),
/// then by content. Numbers compare numerically.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => as_f64(x).total_cmp(&as_f64(y)),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            a.to_string().cmp(&b.to_string())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(0.0)
}

/// Same-kind comparison only; mixed kinds are unordered.
fn partial_compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_))
        | (Value::Bool(_), Value::Bool(_)) => Some(compare_values(a, b)),
        _ => None,
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => as_f64(x) == as_f64(y),
        _ => a == b,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCondition {
    Equals,
    Contains,
    Greater,
    Less,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterOptions {
    pub condition: FilterCondition,
    pub value: Value,
}

/// Keeps rows in which at least one cell satisfies the condition.
#[derive(Debug, Clone)]
pub struct MatrixFilterProcessor {
    options: FilterOptions,
}

impl MatrixFilterProcessor {
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    fn matches(&self, cell: &Value) -> bool {
        let target = &self.options.value;
        match self.options.condition {
            FilterCondition::Equals => loosely_equal(cell, target),
            FilterCondition::Contains => cell_text(cell).contains(&cell_text(target)),
            FilterCondition::Greater => partial_compare(cell, target) == Some(Ordering::Greater),
            FilterCondition::Less => partial_compare(cell, target) == Some(Ordering::Less),
        }
    }

    pub fn filter(&self, matrix: &Matrix) -> Matrix {
        let rows: Vec<Vec<Value>> = matrix
            .rows()
            .iter()
            .filter(|row| row.iter().any(|cell| self.matches(cell)))
            .cloned()
            .collect();
        Matrix::new(rows).unwrap_or_default()
    }
}

impl FromParams for MatrixFilterProcessor {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("matrix_filter", params)?))
    }
}

impl Processor for MatrixFilterProcessor {
    fn name(&self) -> &str {
        "matrix_filter"
    }

    fn process(&self, input: Value) -> Result<Value> {
        Ok(self.filter(&Matrix::from_value(input)?).into_value())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SortOptions {
    pub column_index: i64,
    pub ascending: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            column_index: 0,
            ascending: true,
        }
    }
}

/// Stable sort of rows by one column.
#[derive(Debug, Clone, Default)]
pub struct MatrixSortProcessor {
    options: SortOptions,
}

impl MatrixSortProcessor {
    pub fn new(options: SortOptions) -> Self {
        Self { options }
    }

    pub fn sort(&self, matrix: &Matrix) -> Result<Matrix> {
        if matrix.row_count() <= 1 {
            return Ok(matrix.clone());
        }

        let column = MatrixValidator::checked_index(
            Axis::Column,
            self.options.column_index,
            matrix.column_count(),
        )?;

        let mut rows = matrix.rows().to_vec();
        if self.options.ascending {
            rows.sort_by(|a, b| compare_values(&a[column], &b[column]));
        } else {
            rows.sort_by(|a, b| compare_values(&b[column], &a[column]));
        }
        Matrix::new(rows)
    }
}

impl FromParams for MatrixSortProcessor {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("matrix_sort", params)?))
    }
}

impl Processor for MatrixSortProcessor {
    fn name(&self) -> &str {
        "matrix_sort"
    }

    fn process(&self, input: Value) -> Result<Value> {
        Ok(self.sort(&Matrix::from_value(input)?)?.into_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Sum,
    Mean,
    Min,
    Max,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateAxis {
    Row,
    Column,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateOptions {
    pub operation: Aggregate,
    #[serde(default = "default_aggregate_axis")]
    pub axis: AggregateAxis,
}

fn default_aggregate_axis() -> AggregateAxis {
    AggregateAxis::Column
}

/// One aggregate per column (default) or per row.
#[derive(Debug, Clone)]
pub struct MatrixAggregator {
    options: AggregateOptions,
}

impl MatrixAggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self { options }
    }

    pub fn aggregate(&self, matrix: &Matrix) -> Result<Vec<Value>> {
        let lines = match self.options.axis {
            AggregateAxis::Row => matrix.rows().to_vec(),
            AggregateAxis::Column => matrix.transpose().into_rows(),
        };
        lines.iter().map(|line| self.reduce(line)).collect()
    }

    fn reduce(&self, cells: &[Value]) -> Result<Value> {
        if self.options.operation == Aggregate::Count {
            return Ok(Value::from(cells.len()));
        }

        let numbers = cells
            .iter()
            .map(|cell| {
                cell.as_f64().ok_or_else(|| {
                    PipelineError::invalid_input("matrix_aggregate", "numeric cell", kind_of(cell))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if numbers.is_empty() {
            return Ok(match self.options.operation {
                Aggregate::Sum => Value::from(0),
                _ => Value::Null,
            });
        }

        let result = match self.options.operation {
            Aggregate::Sum => numbers.iter().sum(),
            Aggregate::Mean => numbers.iter().sum::<f64>() / numbers.len() as f64,
            Aggregate::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregate::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Count => numbers.len() as f64,
        };
        Ok(number_value(result))
    }
}

/// Whole results come back as integers, everything else as floats.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl FromParams for MatrixAggregator {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("matrix_aggregate", params)?))
    }
}

impl Processor for MatrixAggregator {
    fn name(&self) -> &str {
        "matrix_aggregate"
    }

    fn process(&self, input: Value) -> Result<Value> {
        Ok(Value::Array(self.aggregate(&Matrix::from_value(input)?)?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReshapeOptions {
    pub rows: usize,
    pub columns: usize,
}

/// Row-major reshape that keeps the element count.
#[derive(Debug, Clone)]
pub struct MatrixReshaper {
    options: ReshapeOptions,
}

impl MatrixReshaper {
    pub fn new(options: ReshapeOptions) -> Self {
        Self { options }
    }

    pub fn reshape(&self, matrix: &Matrix) -> Result<Matrix> {
        let ReshapeOptions { rows, columns } = self.options;
        let cells: Vec<Value> = matrix.rows().iter().flatten().cloned().collect();
        let target = rows.checked_mul(columns).ok_or_else(|| {
            PipelineError::dimension_mismatch("reshape", "element count", usize::MAX, cells.len())
        })?;
        MatrixValidator::check_length("reshape", "element count", target, cells.len())?;

        // zero-width shapes keep the input's row count
        if columns == 0 {
            MatrixValidator::check_length("reshape", "row count", matrix.row_count(), rows)?;
            return Matrix::new(vec![Vec::new(); rows]);
        }
        Matrix::new(cells.chunks(columns).map(<[Value]>::to_vec).collect())
    }
}

impl FromParams for MatrixReshaper {
    fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(parse_params("matrix_reshape", params)?))
    }
}

impl Processor for MatrixReshaper {
    fn name(&self) -> &str {
        "matrix_reshape"
    }

    fn process(&self, input: Value) -> Result<Value> {
        Ok(self.reshape(&Matrix::from_value(input)?)?.into_value())
    }
}
