// file: src/matrix/validator.rs
// description: rectangularity and index checks run before any matrix operation

use crate::error::{Axis, PipelineError, Result};
use crate::pipeline::processor::kind_of;
use serde_json::Value;

pub struct MatrixValidator;

impl MatrixValidator {
    /// Accepts an array of arrays whose rows all share one length.
    /// Zero rows is a valid matrix.
    pub fn validate(value: &Value) -> Result<()> {
        let rows = value.as_array().ok_or_else(|| {
            PipelineError::InvalidMatrix(format!("expected an array of rows, got {}", kind_of(value)))
        })?;

        let mut width = None;
        for (i, row) in rows.iter().enumerate() {
            let cells = row.as_array().ok_or_else(|| {
                PipelineError::InvalidMatrix(format!("row {} is {}, not an array", i, kind_of(row)))
            })?;

            match width {
                None => width = Some(cells.len()),
                Some(expected) if expected != cells.len() => {
                    return Err(PipelineError::InvalidMatrix(format!(
                        "row {} has length {} but row 0 has length {}",
                        i,
                        cells.len(),
                        expected
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Converts a signed index into a position inside `[0, len)`.
    pub fn checked_index(axis: Axis, index: i64, len: usize) -> Result<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or(PipelineError::IndexOutOfRange { axis, index, len })
    }

    pub fn check_position(axis: Axis, index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(PipelineError::IndexOutOfRange {
                axis,
                index: i64::try_from(index).unwrap_or(i64::MAX),
                len,
            })
        }
    }

    pub fn check_length(operation: &str, dimension: &str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(PipelineError::dimension_mismatch(operation, dimension, expected, actual))
        }
    }
}
