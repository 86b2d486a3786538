// file: src/matrix/processors.rs
// description: row, column, element and transpose processors over validated matrices

use crate::error::{Axis, PipelineError, Result};
use crate::matrix::model::Matrix;
use crate::matrix::validator::MatrixValidator;
use crate::pipeline::processor::{FromParams, Params, Processor, parse_params};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineOperation {
    Get,
    Add,
    Update,
    Delete,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LineOptions {
    operation: Option<LineOperation>,
    index: Option<i64>,
    row: Option<Vec<Value>>,
    column: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
enum LineOp {
    Get(i64),
    Add(Vec<Value>),
    Update(i64, Vec<Value>),
    Delete(i64),
}

/// CRUD on whole rows (`matrix_row`) or whole columns (`matrix_col`).
#[derive(Debug, Clone)]
pub struct MatrixLineProcessor {
    axis: Axis,
    op: LineOp,
}

impl MatrixLineProcessor {
    pub fn rows(params: &Params) -> Result<Self> {
        Self::from_axis(Axis::Row, params)
    }

    pub fn columns(params: &Params) -> Result<Self> {
        Self::from_axis(Axis::Column, params)
    }

    fn from_axis(axis: Axis, params: &Params) -> Result<Self> {
        let name = processor_name(axis);
        let data_key = match axis {
            Axis::Row => "row",
            Axis::Column => "column",
        };

        let options: LineOptions = parse_params(name, params)?;
        let operation = options
            .operation
            .ok_or_else(|| PipelineError::parameter(name, "operation", "is required"))?;
        let data = match axis {
            Axis::Row => options.row,
            Axis::Column => options.column,
        };

        let require_index = || {
            options.index.ok_or_else(|| {
                PipelineError::parameter(name, "index", format!("is required for {:?}", operation))
            })
        };
        let require_data = || {
            data.clone().ok_or_else(|| {
                PipelineError::parameter(name, data_key, format!("is required for {:?}", operation))
            })
        };

        let op = match operation {
            LineOperation::Get => LineOp::Get(require_index()?),
            LineOperation::Add => LineOp::Add(require_data()?),
            LineOperation::Update => LineOp::Update(require_index()?, require_data()?),
            LineOperation::Delete => LineOp::Delete(require_index()?),
        };

        Ok(Self { axis, op })
    }

    fn apply(&self, matrix: &Matrix) -> Result<Value> {
        let len = match self.axis {
            Axis::Row => matrix.row_count(),
            Axis::Column => matrix.column_count(),
        };
        let at = |index: i64| MatrixValidator::checked_index(self.axis, index, len);

        let result = match (&self.op, self.axis) {
            (LineOp::Get(i), Axis::Row) => return Ok(Value::Array(matrix.get_row(at(*i)?)?)),
            (LineOp::Get(i), Axis::Column) => {
                return Ok(Value::Array(matrix.get_column(at(*i)?)?));
            }
            (LineOp::Add(data), Axis::Row) => matrix.add_row(data.clone())?,
            (LineOp::Add(data), Axis::Column) => matrix.add_column(data.clone())?,
            (LineOp::Update(i, data), Axis::Row) => matrix.update_row(at(*i)?, data.clone())?,
            (LineOp::Update(i, data), Axis::Column) => {
                matrix.update_column(at(*i)?, data.clone())?
            }
            (LineOp::Delete(i), Axis::Row) => matrix.delete_row(at(*i)?)?,
            (LineOp::Delete(i), Axis::Column) => matrix.delete_column(at(*i)?)?,
        };

        Ok(result.into_value())
    }
}

impl Processor for MatrixLineProcessor {
    fn name(&self) -> &str {
        processor_name(self.axis)
    }

    fn process(&self, input: Value) -> Result<Value> {
        self.apply(&Matrix::from_value(input)?)
    }
}

fn processor_name(axis: Axis) -> &'static str {
    match axis {
        Axis::Row => "matrix_row",
        Axis::Column => "matrix_col",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementOperation {
    Get,
    Update,
}

#[derive(Debug, Clone, Deserialize)]
struct ElementOptions {
    operation: ElementOperation,
    row: i64,
    column: i64,
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct MatrixElementProcessor {
    row: i64,
    column: i64,
    replacement: Option<Value>,
}

impl FromParams for MatrixElementProcessor {
    fn from_params(params: &Params) -> Result<Self> {
        let options: ElementOptions = parse_params("matrix_element", params)?;
        let replacement = match options.operation {
            ElementOperation::Get => None,
            ElementOperation::Update => Some(options.value.ok_or_else(|| {
                PipelineError::parameter("matrix_element", "value", "is required for Update")
            })?),
        };
        Ok(Self {
            row: options.row,
            column: options.column,
            replacement,
        })
    }
}

impl Processor for MatrixElementProcessor {
    fn name(&self) -> &str {
        "matrix_element"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let matrix = Matrix::from_value(input)?;
        let row = MatrixValidator::checked_index(Axis::Row, self.row, matrix.row_count())?;
        let column =
            MatrixValidator::checked_index(Axis::Column, self.column, matrix.column_count())?;

        match &self.replacement {
            None => matrix.get_element(row, column),
            Some(value) => Ok(matrix.update_element(row, column, value.clone())?.into_value()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatrixTransposeProcessor;

impl FromParams for MatrixTransposeProcessor {
    fn from_params(_params: &Params) -> Result<Self> {
        Ok(Self)
    }
}

impl Processor for MatrixTransposeProcessor {
    fn name(&self) -> &str {
        "matrix_transpose"
    }

    fn process(&self, input: Value) -> Result<Value> {
        Ok(Matrix::from_value(input)?.transpose().into_value())
    }
}
