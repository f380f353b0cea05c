//! Document export port definition.

use crate::domain::ExportError;

/// Turns Markdown into printable bytes.
pub trait DocumentExporter: Send + Sync {
    /// Lay out headings, lists and tables. Fails on Markdown it cannot place.
    fn export_structured(&self, markdown: &str) -> Result<Vec<u8>, ExportError>;

    /// Lay out the raw text line by line.
    fn export_plain(&self, text: &str) -> Result<Vec<u8>, ExportError>;
}
