pub mod gemini;
pub mod markdown;
pub mod memory_session_store;
pub mod pdf_exporter;
pub mod templates;

pub use gemini::EnvTextGeneratorFactory;
pub use memory_session_store::MemorySessionStore;
pub use pdf_exporter::PdfExporter;
