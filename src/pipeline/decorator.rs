// file: src/pipeline/decorator.rs
// description: logging wrapper around any processor, gated by a process-wide flag
// reference: https://docs.rs/tracing

use crate::error::Result;
use crate::pipeline::processor::{Processor, summarize};
use crate::utils::Validator;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(false);

pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// Turns stage logging on or off for every decorated processor in the process.
pub fn set_logging(enabled: bool) {
    LOGGING_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn logging_enabled() -> bool {
    LOGGING_ENABLED.load(Ordering::Relaxed)
}

/// Sets the flag until dropped, then puts back the previous value.
#[must_use = "logging reverts as soon as the guard is dropped"]
pub struct LoggingGuard {
    previous: bool,
}

pub fn scoped_logging(enabled: bool) -> LoggingGuard {
    LoggingGuard {
        previous: LOGGING_ENABLED.swap(enabled, Ordering::Relaxed),
    }
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        LOGGING_ENABLED.store(self.previous, Ordering::Relaxed);
    }
}

/// Serializes tests that change the process-wide flag.
#[cfg(test)]
pub(crate) fn flag_lock() -> std::sync::MutexGuard<'static, ()> {
    static FLAG_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    FLAG_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct LoggingProcessor {
    inner: Box<dyn Processor>,
    preview_chars: usize,
}

impl LoggingProcessor {
    pub fn new(inner: Box<dyn Processor>) -> Self {
        Self {
            inner,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    fn preview(&self, value: &Value) -> String {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Validator::truncate_text(&text, self.preview_chars)
    }
}

impl Processor for LoggingProcessor {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn process(&self, input: Value) -> Result<Value> {
        if !logging_enabled() {
            return self.inner.process(input);
        }

        let name = self.inner.name();
        info!(
            "Entering {}: input {} {:?}",
            name,
            summarize(&input),
            self.preview(&input)
        );

        let started = Instant::now();
        let result = self.inner.process(input);
        let elapsed = started.elapsed();

        match &result {
            Ok(output) => info!(
                "Exiting {} after {:.3}ms: result {} {:?}",
                name,
                elapsed.as_secs_f64() * 1000.0,
                summarize(output),
                self.preview(output)
            ),
            Err(e) => warn!(
                "Failed {} after {:.3}ms: {}",
                name,
                elapsed.as_secs_f64() * 1000.0,
                e
            ),
        }

        result
    }

    fn reads_path(&self) -> bool {
        self.inner.reads_path()
    }
}
