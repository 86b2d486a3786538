// file: src/api.rs
// description: high level entry points for text, file and matrix pipelines
// reference: facade over the registry, pipeline builder and file detection

use crate::config::Config;
use crate::error::Result;
use crate::files::csv::delimiter_byte;
use crate::files::{FileType, detect_file_type};
use crate::matrix::{Matrix, MatrixValidator, to_csv, to_custom_text};
use crate::pipeline::definition::{BuildOptions, StageDefinition, build_pipeline, build_stages};
use crate::pipeline::processor::{Params, Processor};
use crate::pipeline::{CompositeProcessor, decorator, registry};
use crate::utils::Validator;
use serde_json::{Value, json};
use std::path::Path;
use tracing::{debug, info};

/// Builds and runs pipelines against the process-wide registry.
///
/// Every `process_*` call resolves its stage list, merges the shared
/// parameters into each stage, then runs the stages in order.
#[derive(Debug, Clone, Default)]
pub struct TextProcessingApi {
    config: Config,
}

impl TextProcessingApi {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn create_pipeline(
        &self,
        definition: &[StageDefinition],
        shared: &Params,
    ) -> Result<CompositeProcessor> {
        let options = self.config.pipeline.build_options();
        let shared = Self::seeded(shared, options);
        registry::with_global(|registry| build_pipeline(registry, definition, &shared, options))
    }

    /// Shared params carrying the build options, so stages that build nested
    /// pipelines follow the configured decoration.
    fn seeded(shared: &Params, options: BuildOptions) -> Params {
        let mut seeded = shared.clone();
        options.seed(&mut seeded);
        seeded
    }

    pub fn process_text(
        &self,
        text: &str,
        definition: &[StageDefinition],
        shared: &Params,
    ) -> Result<Value> {
        let pipeline = self.create_pipeline(definition, shared)?;
        pipeline.process(Value::String(text.to_string()))
    }

    /// Runs `definition` on the file at `path`.
    ///
    /// When the first stage does not read a path itself, a reader stage is
    /// placed in front: `csv_file` for csv, `text_file` for text. The type
    /// comes from `file_type` or, when absent, from extension and content
    /// detection.
    pub fn process_file(
        &self,
        path: &str,
        definition: &[StageDefinition],
        file_type: Option<FileType>,
        shared: &Params,
    ) -> Result<Value> {
        let path = Validator::validate_file_path(path)?;
        let options = self.config.pipeline.build_options();
        let shared = &Self::seeded(shared, options);

        let user_stages =
            registry::with_global(|registry| build_stages(registry, definition, shared, options))?;

        let mut pipeline = CompositeProcessor::new();
        if !user_stages.first().is_some_and(|stage| stage.reads_path()) {
            let file_type = match file_type {
                Some(file_type) => file_type,
                None => detect_file_type(&path, &self.config.files)?,
            };
            info!("Processing {} as {:?}", path.display(), file_type);

            let reader = self.reader_stage(&path, file_type);
            let reader_stages = registry::with_global(|registry| {
                build_stages(registry, std::slice::from_ref(&reader), shared, options)
            })?;
            for stage in reader_stages {
                pipeline.add(stage);
            }
        } else {
            debug!("First stage reads {} directly", path.display());
        }

        for stage in user_stages {
            pipeline.add(stage);
        }

        pipeline.process(Value::String(path.to_string_lossy().into_owned()))
    }

    /// Reader stage for `file_type` that also accepts the file's own extension.
    fn reader_stage(&self, path: &Path, file_type: FileType) -> StageDefinition {
        let mut extensions = match file_type {
            FileType::Text => self.config.files.text_extensions.clone(),
            FileType::Csv => self.config.files.csv_extensions.clone(),
        };
        if let Some(extension) = Validator::extension_of(path)
            && !extensions.iter().any(|e| e.eq_ignore_ascii_case(&extension))
        {
            extensions.push(extension);
        }

        StageDefinition::new(file_type.reader(), json!({ "extensions": extensions }))
    }

    /// Validates `matrix` before building the pipeline, so a malformed matrix
    /// fails before any stage runs.
    pub fn process_matrix(
        &self,
        matrix: &Value,
        definition: &[StageDefinition],
        shared: &Params,
    ) -> Result<Value> {
        MatrixValidator::validate(matrix)?;
        let pipeline = self.create_pipeline(definition, shared)?;
        pipeline.process(matrix.clone())
    }

    pub fn matrix_to_csv(&self, matrix: &Value, delimiter: &str) -> Result<String> {
        let delimiter = delimiter_byte("matrix_to_csv", delimiter)?;
        to_csv(&Matrix::from_value(matrix.clone())?, delimiter)
    }

    pub fn matrix_to_text(
        &self,
        matrix: &Value,
        row_separator: &str,
        col_separator: &str,
    ) -> Result<String> {
        Ok(to_custom_text(
            &Matrix::from_value(matrix.clone())?,
            row_separator,
            col_separator,
        ))
    }

    fn single_matrix_op(&self, matrix: &Value, processor: &str, params: Value) -> Result<Value> {
        self.process_matrix(
            matrix,
            &[StageDefinition::new(processor, params)],
            &Params::new(),
        )
    }

    pub fn get_matrix_row(&self, matrix: &Value, index: i64) -> Result<Value> {
        self.single_matrix_op(matrix, "matrix_row", json!({"operation": "get", "index": index}))
    }

    pub fn add_matrix_row(&self, matrix: &Value, row: Vec<Value>) -> Result<Value> {
        self.single_matrix_op(matrix, "matrix_row", json!({"operation": "add", "row": row}))
    }

    pub fn update_matrix_row(&self, matrix: &Value, index: i64, row: Vec<Value>) -> Result<Value> {
        self.single_matrix_op(
            matrix,
            "matrix_row",
            json!({"operation": "update", "index": index, "row": row}),
        )
    }

    pub fn delete_matrix_row(&self, matrix: &Value, index: i64) -> Result<Value> {
        self.single_matrix_op(matrix, "matrix_row", json!({"operation": "delete", "index": index}))
    }

    pub fn get_matrix_column(&self, matrix: &Value, index: i64) -> Result<Value> {
        self.single_matrix_op(matrix, "matrix_col", json!({"operation": "get", "index": index}))
    }

    pub fn add_matrix_column(&self, matrix: &Value, column: Vec<Value>) -> Result<Value> {
        self.single_matrix_op(matrix, "matrix_col", json!({"operation": "add", "column": column}))
    }

    pub fn update_matrix_column(
        &self,
        matrix: &Value,
        index: i64,
        column: Vec<Value>,
    ) -> Result<Value> {
        self.single_matrix_op(
            matrix,
            "matrix_col",
            json!({"operation": "update", "index": index, "column": column}),
        )
    }

    pub fn delete_matrix_column(&self, matrix: &Value, index: i64) -> Result<Value> {
        self.single_matrix_op(matrix, "matrix_col", json!({"operation": "delete", "index": index}))
    }

    pub fn get_matrix_element(&self, matrix: &Value, row: i64, column: i64) -> Result<Value> {
        self.single_matrix_op(
            matrix,
            "matrix_element",
            json!({"operation": "get", "row": row, "column": column}),
        )
    }

    pub fn update_matrix_element(
        &self,
        matrix: &Value,
        row: i64,
        column: i64,
        value: Value,
    ) -> Result<Value> {
        self.single_matrix_op(
            matrix,
            "matrix_element",
            json!({"operation": "update", "row": row, "column": column, "value": value}),
        )
    }

    /// Sorted names of every processor in the process-wide registry.
    pub fn list_available_processors() -> Vec<String> {
        registry::with_global(|registry| registry.list_names())
    }

    /// Adds or replaces a processor in the process-wide registry.
    pub fn register_processor<F>(name: impl Into<String>, factory: F)
    where
        F: Fn(&Params) -> Result<Box<dyn Processor>> + Send + Sync + 'static,
    {
        registry::register_global(name, factory);
    }

    pub fn set_logging(enabled: bool) {
        decorator::set_logging(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::pipeline::FnProcessor;
    use crate::pipeline::processor::expect_str;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn api() -> TextProcessingApi {
        TextProcessingApi::default()
    }

    fn stages(items: Vec<StageDefinition>) -> Vec<StageDefinition> {
        items
    }

    fn grid() -> Value {
        json!([[1, 2, 3], [4, 5, 6], [7, 8, 9]])
    }

    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::write(
                temp.path().join("api_test.txt"),
                "Hello, world! This is an API test.",
            )
            .unwrap();
            fs::write(
                temp.path().join("api_test.csv"),
                "ID,Value\r\nA1,100\r\nB2,200\r\nC3,300\r\n",
            )
            .unwrap();
            fs::write(
                temp.path().join("no_extension"),
                "No extension API test content",
            )
            .unwrap();
            Self { temp }
        }

        fn path(&self, name: &str) -> String {
            self.temp.path().join(name).to_string_lossy().into_owned()
        }
    }

    #[test]
    fn test_text_processing_pipeline() {
        let definition = stages(vec![
            "clean".into(),
            "tokenize".into(),
            ("keywords", json!({"top_k": 3})).into(),
        ]);
        let result = api()
            .process_text(
                "Python is great. I love Python programming.",
                &definition,
                &Params::new(),
            )
            .unwrap();
        assert_eq!(result, json!(["Python", "is", "great"]));
    }

    #[test]
    fn test_file_pipeline_with_explicit_reader() {
        let fixture = Fixture::new();
        let definition = stages(vec![
            ("text_file", json!({"encoding": "utf-8"})).into(),
            "clean".into(),
            "tokenize".into(),
        ]);

        let result = api()
            .process_file(&fixture.path("api_test.txt"), &definition, None, &Params::new())
            .unwrap();
        assert_eq!(
            result,
            json!(["Hello", "world", "This", "is", "an", "API", "test"])
        );

        let result = api()
            .process_file(&fixture.path("no_extension"), &definition, None, &Params::new())
            .unwrap();
        assert_eq!(result, json!(["No", "extension", "API", "test", "content"]));
    }

    #[test]
    fn test_file_pipeline_prepends_detected_reader() {
        let fixture = Fixture::new();

        let words = api()
            .process_file(
                &fixture.path("api_test.txt"),
                &stages(vec!["clean".into(), "tokenize".into()]),
                None,
                &Params::new(),
            )
            .unwrap();
        assert_eq!(words.as_array().unwrap().len(), 7);

        let column = api()
            .process_file(
                &fixture.path("api_test.csv"),
                &stages(vec![("matrix_col", json!({"operation": "get", "index": 1})).into()]),
                None,
                &Params::new(),
            )
            .unwrap();
        assert_eq!(column, json!(["Value", "100", "200", "300"]));
    }

    #[test]
    fn test_csv_processing_pipeline() {
        let fixture = Fixture::new();
        let csv = fixture.path("api_test.csv");

        let extract = stages(vec![
            (
                "csv_extract",
                json!({"column_index": 1, "has_header": true, "output_format": "list"}),
            )
                .into(),
        ]);
        assert_eq!(
            api().process_file(&csv, &extract, None, &Params::new()).unwrap(),
            json!(["100", "200", "300"])
        );

        let full = stages(vec![
            ("csv_file", json!({"has_header": true})).into(),
            ("matrix_col", json!({"operation": "get", "index": 1})).into(),
        ]);
        assert_eq!(
            api().process_file(&csv, &full, None, &Params::new()).unwrap(),
            json!(["100", "200", "300"])
        );
    }

    #[test]
    fn test_forced_file_type_and_shared_params() {
        let fixture = Fixture::new();
        let mut shared = Params::new();
        shared.insert("has_header".to_string(), json!(true));

        let rows = api()
            .process_file(
                &fixture.path("no_extension"),
                &[],
                Some(FileType::Csv),
                &shared,
            )
            .unwrap();
        assert_eq!(rows, json!([]));

        let rows = api()
            .process_file(&fixture.path("api_test.csv"), &[], None, &shared)
            .unwrap();
        assert_eq!(rows[0], json!(["A1", "100"]));
    }

    #[test]
    fn test_unsupported_and_invalid_files() {
        let fixture = Fixture::new();
        let json_file = fixture.temp.path().join("data.json");
        fs::write(&json_file, "{\"a\": 1}").unwrap();

        let err = api()
            .process_file(&json_file.to_string_lossy(), &["clean".into()], None, &Params::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFileType { .. }));

        let err = api()
            .process_file("invalid_path.txt", &["text_file".into()], None, &Params::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPath(_)));

        let err = api()
            .process_file("", &[], None, &Params::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPath(_)));
    }

    #[test]
    fn test_matrix_processing_pipeline() {
        let definition = stages(vec![
            ("matrix_transpose", json!({})).into(),
            ("matrix_row", json!({"operation": "get", "index": 1})).into(),
        ]);
        assert_eq!(
            api().process_matrix(&grid(), &definition, &Params::new()).unwrap(),
            json!([2, 5, 8])
        );
    }

    #[test]
    fn test_matrix_helpers() {
        let api = api();
        let m = grid();

        assert_eq!(api.get_matrix_row(&m, 1).unwrap(), json!([4, 5, 6]));
        let added = api.add_matrix_row(&m, vec![json!(10), json!(11), json!(12)]).unwrap();
        assert_eq!(added[3], json!([10, 11, 12]));
        let updated = api.update_matrix_row(&m, 0, vec![json!(0); 3]).unwrap();
        assert_eq!(updated[0], json!([0, 0, 0]));
        assert_eq!(
            api.delete_matrix_row(&m, 1).unwrap(),
            json!([[1, 2, 3], [7, 8, 9]])
        );

        assert_eq!(api.get_matrix_column(&m, 1).unwrap(), json!([2, 5, 8]));
        let added = api.add_matrix_column(&m, vec![json!(10), json!(11), json!(12)]).unwrap();
        assert_eq!(added[2], json!([7, 8, 9, 12]));
        let updated = api.update_matrix_column(&m, 0, vec![json!(0); 3]).unwrap();
        assert_eq!(updated, json!([[0, 2, 3], [0, 5, 6], [0, 8, 9]]));
        assert_eq!(
            api.delete_matrix_column(&m, 1).unwrap(),
            json!([[1, 3], [4, 6], [7, 9]])
        );

        assert_eq!(api.get_matrix_element(&m, 1, 1).unwrap(), json!(5));
        let updated = api.update_matrix_element(&m, 0, 0, json!(10)).unwrap();
        assert_eq!(updated[0][0], json!(10));

        assert_eq!(
            api.get_matrix_row(&json!([[1, 2], [3, 4]]), 0).unwrap(),
            json!([1, 2])
        );
        assert_eq!(
            api.get_matrix_column(&json!([[1, 2], [3, 4]]), 1).unwrap(),
            json!([2, 4])
        );
    }

    #[test]
    fn test_create_pipeline() {
        let pipeline = api()
            .create_pipeline(&["clean".into(), ("tokenize", json!({})).into()], &Params::new())
            .unwrap();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.stage_names(), vec!["clean", "tokenize"]);
        assert_eq!(
            pipeline.process(json!("Hello, world!")).unwrap(),
            json!(["Hello", "world"])
        );
    }

    #[test]
    fn test_processor_not_found() {
        let err = api()
            .process_text("test", &["invalid_processor".into()], &Params::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownProcessor { .. }));
    }

    #[test]
    fn test_matrix_conversion() {
        let matrix = json!([["Name", "Age"], ["Alice", 30], ["Bob", 25]]);
        assert_eq!(
            api().matrix_to_csv(&matrix, ",").unwrap(),
            "Name,Age\r\nAlice,30\r\nBob,25\r\n"
        );
        assert_eq!(
            api().matrix_to_text(&grid(), "|", ",").unwrap(),
            "1,2,3|4,5,6|7,8,9"
        );
    }

    #[test]
    fn test_list_processors() {
        let processors = TextProcessingApi::list_available_processors();
        for name in ["clean", "csv_file", "matrix_transpose"] {
            assert!(processors.iter().any(|p| p == name), "missing {name}");
        }
    }

    #[test]
    fn test_register_new_processor() {
        TextProcessingApi::register_processor("uppercase", |_: &Params| {
            Ok(Box::new(FnProcessor::new("uppercase", |v: Value| {
                Ok(Value::String(expect_str("uppercase", &v)?.to_uppercase()))
            })) as Box<dyn Processor>)
        });

        assert!(
            TextProcessingApi::list_available_processors()
                .iter()
                .any(|p| p == "uppercase")
        );
        assert_eq!(
            api()
                .process_text("hello", &["uppercase".into()], &Params::new())
                .unwrap(),
            json!("HELLO")
        );
    }

    #[test]
    fn test_logging_toggle_keeps_results() {
        let _lock = decorator::flag_lock();
        let previous = decorator::logging_enabled();

        TextProcessingApi::set_logging(true);
        let pipeline = api()
            .create_pipeline(&["clean".into(), "tokenize".into()], &Params::new())
            .unwrap();
        let result = pipeline.process(json!("Hello, world!"));
        TextProcessingApi::set_logging(previous);

        assert_eq!(result.unwrap(), json!(["Hello", "world"]));
    }

    #[test]
    fn test_invalid_matrix_fails_before_stages() {
        let err = api()
            .process_matrix(
                &json!([[1, 2, 3], [4, 5], [6, 7, 8]]),
                &["missing_stage".into()],
                &Params::new(),
            )
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidMatrix(_)));
    }

    #[test]
    fn test_out_of_range_index() {
        let err = api().get_matrix_row(&json!([[1, 2], [3, 4]]), 2).unwrap_err();
        assert!(matches!(err.root(), PipelineError::IndexOutOfRange { .. }));
        assert_eq!(err.stage(), Some((0, "matrix_row")));

        let err = api().get_matrix_column(&json!([[1, 2], [3, 4]]), -1).unwrap_err();
        assert!(matches!(err.root(), PipelineError::IndexOutOfRange { .. }));
    }
}
