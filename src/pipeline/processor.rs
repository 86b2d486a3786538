// file: src/pipeline/processor.rs
// description: the processor contract shared by every pipeline stage
// reference: single-method transform over json values

use crate::error::{PipelineError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Parameters handed to a processor factory, keyed by option name.
pub type Params = Map<String, Value>;

/// A named unit that turns one value into another.
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, input: Value) -> Result<Value>;

    /// True for processors whose input is a filesystem path rather than data.
    fn reads_path(&self) -> bool {
        false
    }
}

/// Construction from a parameter map, used by `ProcessorRegistry::register_type`.
pub trait FromParams: Sized {
    fn from_params(params: &Params) -> Result<Self>;
}

/// Deserializes `params` into a processor's option struct.
///
/// Unrecognized keys are ignored so that shared parameters can be merged into
/// every stage of a pipeline. A recognized key with the wrong type fails.
pub fn parse_params<T: DeserializeOwned>(processor: &str, params: &Params) -> Result<T> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| PipelineError::parameter(processor, "params", e.to_string()))
}

/// Adapts a plain closure into a processor.
pub struct FnProcessor<F> {
    name: String,
    func: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, input: Value) -> Result<Value> {
        (self.func)(input)
    }
}

/// Short type name of a value, used in error messages and log lines.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Opaque size summary such as `string(12 chars)` or `array(3 items)`.
pub fn summarize(value: &Value) -> String {
    match value {
        Value::String(s) => format!("string({} chars)", s.chars().count()),
        Value::Array(items) => format!("array({} items)", items.len()),
        Value::Object(map) => format!("object({} keys)", map.len()),
        other => kind_of(other).to_string(),
    }
}

/// Borrows the string inside `value` or reports what was received instead.
pub fn expect_str<'a>(processor: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| PipelineError::invalid_input(processor, "string", kind_of(value)))
}
