// file: src/files/mod.rs
// description: file processing module exports and registration
// reference: internal module structure

pub mod batch;
pub mod csv;
pub mod detect;
pub mod metadata;
pub mod readers;

pub use batch::{BatchOptions, FileBatchProcessor};
pub use csv::{
    ColumnFormat, CsvColumnExtractor, CsvContentParser, CsvFileReader, CsvReadOptions,
    ExtractOptions, MultiColumnCsvReader, MultiColumnOptions,
};
pub use detect::{FileType, detect_file_type};
pub use metadata::{FileMetadataExtractor, MetadataOptions};
pub use readers::{FileToText, TextFileOptions, TextFileReader};

use crate::pipeline::processor::parse_params;
use crate::pipeline::{Params, Processor, ProcessorRegistry};

pub fn register_builtins(registry: &mut ProcessorRegistry) {
    registry.register_type::<TextFileReader>("text_file");
    registry.register_type::<CsvFileReader>("csv_file");
    registry.register_type::<CsvColumnExtractor>("csv_extract");
    registry.register_type::<MultiColumnCsvReader>("multi_column_csv");
    registry.register_type::<FileToText>("file_to_text");
    registry.register("csv_to_matrix_file", |params: &Params| {
        let options = parse_params("csv_to_matrix_file", params)?;
        Ok(Box::new(CsvFileReader::matrix_reader(options)?) as Box<dyn Processor>)
    });
    registry.register_type::<FileMetadataExtractor>("file_metadata");
    registry.register_type::<CsvContentParser>("csv_content_to_matrix");
    registry.register("csv_to_matrix", |params: &Params| {
        let options = parse_params("csv_to_matrix", params)?;
        Ok(Box::new(CsvContentParser::new("csv_to_matrix", options)?) as Box<dyn Processor>)
    });
    registry.register_type::<FileBatchProcessor>("batch_processor");
}
