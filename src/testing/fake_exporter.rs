use std::sync::{Arc, Mutex};

use crate::domain::ExportError;
use crate::ports::DocumentExporter;

/// Exporter whose structured layout can be made to fail.
#[derive(Clone, Default)]
pub struct FakeExporter {
    pub fail_structured: bool,
    pub plain_calls: Arc<Mutex<usize>>,
}

impl FakeExporter {
    pub fn failing_structured() -> Self {
        Self { fail_structured: true, ..Default::default() }
    }

    pub fn plain_call_count(&self) -> usize {
        *self.plain_calls.lock().unwrap()
    }
}

impl DocumentExporter for FakeExporter {
    fn export_structured(&self, markdown: &str) -> Result<Vec<u8>, ExportError> {
        if self.fail_structured {
            return Err(ExportError::ExportFailure("fake: structured layout disabled".into()));
        }
        Ok(format!("structured:{}", markdown).into_bytes())
    }

    fn export_plain(&self, text: &str) -> Result<Vec<u8>, ExportError> {
        *self.plain_calls.lock().unwrap() += 1;
        Ok(format!("plain:{}", text).into_bytes())
    }
}
