// file: src/matrix/mod.rs
// description: matrix module exports and registration
// reference: internal module structure

pub mod convert;
pub mod model;
pub mod processors;
pub mod transform;
pub mod validator;

pub use convert::{ConvertOptions, MatrixConverter, OutputFormat, cell_text, to_csv, to_custom_text};
pub use model::Matrix;
pub use processors::{
    ElementOperation, LineOperation, MatrixElementProcessor, MatrixLineProcessor,
    MatrixTransposeProcessor,
};
pub use transform::{
    MatrixAggregator, MatrixFilterProcessor, MatrixReshaper, MatrixSortProcessor,
};
pub use validator::MatrixValidator;

use crate::pipeline::{Params, Processor, ProcessorRegistry};

pub fn register_builtins(registry: &mut ProcessorRegistry) {
    registry.register("matrix_row", |params: &Params| {
        Ok(Box::new(MatrixLineProcessor::rows(params)?) as Box<dyn Processor>)
    });
    registry.register("matrix_col", |params: &Params| {
        Ok(Box::new(MatrixLineProcessor::columns(params)?) as Box<dyn Processor>)
    });
    registry.register_type::<MatrixElementProcessor>("matrix_element");
    registry.register_type::<MatrixTransposeProcessor>("matrix_transpose");
    registry.register_type::<MatrixConverter>("matrix_convert");
    registry.register_type::<MatrixFilterProcessor>("matrix_filter");
    registry.register_type::<MatrixSortProcessor>("matrix_sort");
    registry.register_type::<MatrixAggregator>("matrix_aggregate");
    registry.register_type::<MatrixReshaper>("matrix_reshape");
}
