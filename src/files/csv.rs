// file: src/files/csv.rs
// description: csv file and csv text readers producing matrices and columns
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::files::readers::{CSV_EXTENSIONS, extension_list, resolve_path};
use crate::matrix::convert::cell_text;
use crate::pipeline::processor::{
    FromParams, Params, Processor, expect_str, kind_of, parse_params,
};
use csv::ReaderBuilder;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Converts a delimiter option into the single byte the csv crate expects.
pub fn delimiter_byte(processor: &str, delimiter: &str) -> Result<u8> {
    match delimiter.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(PipelineError::parameter(
            processor,
            "delimiter",
            format!("must be a single ASCII character, got {:?}", delimiter),
        )),
    }
}

/// Reads every record. Rows may differ in length; blank lines are dropped.
pub fn read_records<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

pub fn read_csv_file(path: &Path, delimiter: u8) -> Result<Vec<Vec<String>>> {
    debug!("Reading csv file: {}", path.display());
    let file = File::open(path).map_err(|source| PipelineError::FileOperation {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(file, delimiter)
}

pub fn rows_to_value(rows: Vec<Vec<String>>) -> Value {
    Value::Array(
        rows.into_iter()
            .map(|row| Value::Array(row.into_iter().map(Value::String).collect()))
            .collect(),
    )
}

fn default_delimiter() -> String {
    ",".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsvReadOptions {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub has_header: bool,
    #[serde(default)]
    pub skip_rows: usize,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_header: false,
            skip_rows: 0,
            extensions: None,
        }
    }
}

/// Shared reader state for `csv_file`, `csv_to_matrix_file` and the csv text parsers.
#[derive(Debug, Clone)]
struct CsvLayout {
    delimiter: u8,
    skip: usize,
}

impl CsvLayout {
    fn from_options(processor: &str, options: &CsvReadOptions) -> Result<Self> {
        Ok(Self {
            delimiter: delimiter_byte(processor, &options.delimiter)?,
            skip: options.skip_rows + usize::from(options.has_header),
        })
    }

    fn trim(&self, rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
        rows.into_iter().skip(self.skip).collect()
    }
}

/// Reads a .csv file (or one with no extension) into rows of strings.
/// `csv_file` honours `has_header`; `csv_to_matrix_file` also honours `skip_rows`.
#[derive(Debug, Clone)]
pub struct CsvFileReader {
    name: &'static str,
    layout: CsvLayout,
    extensions: Vec<String>,
}

impl CsvFileReader {
    pub fn new(options: CsvReadOptions) -> Result<Self> {
        let options = CsvReadOptions {
            skip_rows: 0,
            ..options
        };
        Self::named("csv_file", options)
    }

    pub fn matrix_reader(options: CsvReadOptions) -> Result<Self> {
        Self::named("csv_to_matrix_file", options)
    }

    fn named(name: &'static str, options: CsvReadOptions) -> Result<Self> {
        let layout = CsvLayout::from_options(name, &options)?;
        Ok(Self {
            name,
            layout,
            extensions: extension_list(options.extensions, CSV_EXTENSIONS),
        })
    }
}

impl FromParams for CsvFileReader {
    fn from_params(params: &Params) -> Result<Self> {
        Self::new(parse_params("csv_file", params)?)
    }
}

impl Processor for CsvFileReader {
    fn name(&self) -> &str {
        self.name
    }

    fn process(&self, input: Value) -> Result<Value> {
        let path = resolve_path(self.name, &input, &self.extensions)?;
        let rows = read_csv_file(&path, self.layout.delimiter)?;
        Ok(rows_to_value(self.layout.trim(rows)))
    }

    fn reads_path(&self) -> bool {
        true
    }
}

/// Parses csv text already held in memory.
#[derive(Debug, Clone)]
pub struct CsvContentParser {
    name: String,
    layout: CsvLayout,
}

impl CsvContentParser {
    pub fn new(name: impl Into<String>, options: CsvReadOptions) -> Result<Self> {
        let name = name.into();
        let options = CsvReadOptions {
            skip_rows: 0,
            ..options
        };
        let layout = CsvLayout::from_options(&name, &options)?;
        Ok(Self { name, layout })
    }
}

impl FromParams for CsvContentParser {
    fn from_params(params: &Params) -> Result<Self> {
        Self::new(
            "csv_content_to_matrix",
            parse_params("csv_content_to_matrix", params)?,
        )
    }
}

impl Processor for CsvContentParser {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, input: Value) -> Result<Value> {
        let text = expect_str(&self.name, &input)?;
        let rows = read_records(text.as_bytes(), self.layout.delimiter)?;
        Ok(rows_to_value(self.layout.trim(rows)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFormat {
    Text,
    List,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractOptions {
    #[serde(default)]
    pub column_index: usize,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub has_header: bool,
    #[serde(default = "default_column_format")]
    pub output_format: ColumnFormat,
}

fn default_column_format() -> ColumnFormat {
    ColumnFormat::Text
}

/// Pulls one column out of a csv file or an already-read matrix. Rows too
/// short to hold the column are skipped. Text output joins cells with spaces.
#[derive(Debug, Clone)]
pub struct CsvColumnExtractor {
    column_index: usize,
    delimiter: u8,
    has_header: bool,
    output_format: ColumnFormat,
}

impl CsvColumnExtractor {
    pub fn new(options: ExtractOptions) -> Result<Self> {
        Ok(Self {
            column_index: options.column_index,
            delimiter: delimiter_byte("csv_extract", &options.delimiter)?,
            has_header: options.has_header,
            output_format: options.output_format,
        })
    }

    fn rows_of(&self, input: Value) -> Result<Vec<Vec<Value>>> {
        match input {
            Value::String(_) => {
                let path = resolve_path("csv_extract", &input, CSV_EXTENSIONS)?;
                let rows = read_csv_file(&path, self.delimiter)?;
                Ok(rows
                    .into_iter()
                    .map(|row| row.into_iter().map(Value::String).collect())
                    .collect())
            }
            Value::Array(rows) => rows
                .into_iter()
                .map(|row| match row {
                    Value::Array(cells) => Ok(cells),
                    other => Err(PipelineError::invalid_input(
                        "csv_extract",
                        "array of rows",
                        kind_of(&other),
                    )),
                })
                .collect(),
            other => Err(PipelineError::invalid_input(
                "csv_extract",
                "path or matrix",
                kind_of(&other),
            )),
        }
    }
}

impl FromParams for CsvColumnExtractor {
    fn from_params(params: &Params) -> Result<Self> {
        Self::new(parse_params("csv_extract", params)?)
    }
}

impl Processor for CsvColumnExtractor {
    fn name(&self) -> &str {
        "csv_extract"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let column: Vec<Value> = self
            .rows_of(input)?
            .into_iter()
            .skip(usize::from(self.has_header))
            .filter_map(|mut row| {
                (self.column_index < row.len()).then(|| row.swap_remove(self.column_index))
            })
            .collect();

        Ok(match self.output_format {
            ColumnFormat::List => Value::Array(column),
            ColumnFormat::Text => Value::String(
                column.iter().map(cell_text).collect::<Vec<_>>().join(" "),
            ),
        })
    }

    fn reads_path(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultiColumnOptions {
    #[serde(default)]
    pub columns: Vec<usize>,
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_true")]
    pub has_header: bool,
}

fn default_true() -> bool {
    true
}

/// Selects columns by index, or by header name when no indices are given.
/// With neither, every column is kept.
#[derive(Debug, Clone)]
pub struct MultiColumnCsvReader {
    columns: Vec<usize>,
    column_names: Vec<String>,
    delimiter: u8,
    has_header: bool,
}

impl MultiColumnCsvReader {
    pub fn new(options: MultiColumnOptions) -> Result<Self> {
        Ok(Self {
            columns: options.columns,
            column_names: options.column_names,
            delimiter: delimiter_byte("multi_column_csv", &options.delimiter)?,
            has_header: options.has_header,
        })
    }

    fn target_indices(&self, header: Option<&[String]>) -> Result<Vec<usize>> {
        if !self.columns.is_empty() {
            return Ok(self.columns.clone());
        }

        match header {
            Some(header) if !self.column_names.is_empty() => {
                let positions: HashMap<&str, usize> = header
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.as_str(), i))
                    .collect();

                self.column_names
                    .iter()
                    .map(|name| {
                        positions.get(name.as_str()).copied().ok_or_else(|| {
                            PipelineError::invalid_input(
                                "multi_column_csv",
                                format!("column named '{}'", name),
                                "a header without it",
                            )
                        })
                    })
                    .collect()
            }
            _ => Ok(Vec::new()),
        }
    }
}

impl FromParams for MultiColumnCsvReader {
    fn from_params(params: &Params) -> Result<Self> {
        Self::new(parse_params("multi_column_csv", params)?)
    }
}

impl Processor for MultiColumnCsvReader {
    fn name(&self) -> &str {
        "multi_column_csv"
    }

    fn process(&self, input: Value) -> Result<Value> {
        let path = resolve_path("multi_column_csv", &input, CSV_EXTENSIONS)?;
        let mut rows = read_csv_file(&path, self.delimiter)?.into_iter();

        let header = if self.has_header { rows.next() } else { None };
        let targets = self.target_indices(header.as_deref())?;

        let selected: Vec<Vec<String>> = rows
            .map(|row| {
                if targets.is_empty() {
                    row
                } else {
                    targets
                        .iter()
                        .filter_map(|&i| row.get(i).cloned())
                        .collect()
                }
            })
            .collect();

        Ok(rows_to_value(selected))
    }

    fn reads_path(&self) -> bool {
        true
    }
}
