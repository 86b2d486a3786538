// file: src/matrix/convert.rs
// description: matrix to csv, delimited text, dict and json conversion
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::files::csv::delimiter_byte;
use crate::matrix::model::Matrix;
use crate::pipeline::processor::{FromParams, Params, Processor, parse_params};
use csv::{Terminator, WriterBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Text form of a cell: strings verbatim, null as empty, everything else as JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Writes every row terminated by `\r\n`, quoting cells only where needed.
/// A row with no cells is written as `""`, the same as a row holding one
/// empty cell, so every row stays visible as a line.
pub fn to_csv(matrix: &Matrix, delimiter: u8) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    for row in matrix.rows() {
        writer.write_record(row.iter().map(cell_text))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Joins cells and rows with the given separators. No escaping is applied.
pub fn to_custom_text(matrix: &Matrix, row_separator: &str, col_separator: &str) -> String {
    matrix
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(cell_text)
                .collect::<Vec<_>>()
                .join(col_separator)
        })
        .collect::<Vec<_>>()
        .join(row_separator)
}

/// Keys each row by the text of its first cell. Later rows win on duplicate keys.
pub fn to_dict(matrix: &Matrix) -> Map<String, Value> {
    matrix
        .rows()
        .iter()
        .filter_map(|row| {
            row.first()
                .map(|key| (cell_text(key), Value::Array(row.clone())))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    List,
    Dict,
    Json,
    Csv,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub output_format: OutputFormat,
    pub row_separator: String,
    pub col_separator: String,
    pub delimiter: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::List,
            row_separator: "\n".to_string(),
            col_separator: "\t".to_string(),
            delimiter: ",".to_string(),
        }
    }
}

pub struct MatrixConverter {
    options: ConvertOptions,
    delimiter: u8,
}

impl MatrixConverter {
    pub fn new(options: ConvertOptions) -> Result<Self> {
        let delimiter = delimiter_byte("matrix_convert", &options.delimiter)?;
        Ok(Self { options, delimiter })
    }

    pub fn convert(&self, matrix: Matrix) -> Result<Value> {
        Ok(match self.options.output_format {
            OutputFormat::List => matrix.into_value(),
            OutputFormat::Dict => Value::Object(to_dict(&matrix)),
            OutputFormat::Json => Value::String(serde_json::to_string(&to_dict(&matrix))?),
            OutputFormat::Csv => Value::String(to_csv(&matrix, self.delimiter)?),
            OutputFormat::Text => Value::String(to_custom_text(
                &matrix,
                &self.options.row_separator,
                &self.options.col_separator,
            )),
        })
    }
}

impl FromParams for MatrixConverter {
    fn from_params(params: &Params) -> Result<Self> {
        Self::new(parse_params("matrix_convert", params)?)
    }
}

impl Processor for MatrixConverter {
    fn name(&self) -> &str {
        "matrix_convert"
    }

    fn process(&self, input: Value) -> Result<Value> {
        self.convert(Matrix::from_value(input)?)
    }
}
