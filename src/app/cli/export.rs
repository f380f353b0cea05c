//! Export command implementation.

use std::path::Path;

use crate::adapters::PdfExporter;
use crate::app::commands::export::export_document;
use crate::domain::{AppError, ExportLayout, GuidiaConfig};

pub fn run_export(config: &GuidiaConfig, input: &Path, output: &Path) -> Result<(), AppError> {
    let markdown = std::fs::read_to_string(input)?;
    let document = export_document(&PdfExporter::default(), &config.export, &markdown)?;
    std::fs::write(output, &document.bytes)?;

    match document.layout {
        ExportLayout::Structured => println!("✅ Exported {}", output.display()),
        ExportLayout::Plain => {
            println!("⚠️  Table layout failed, exported plain text to {}", output.display())
        }
    }
    Ok(())
}
