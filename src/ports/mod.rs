mod document_exporter;
mod session_store;
mod text_generator;

pub use document_exporter::DocumentExporter;
pub use session_store::SessionStore;
pub use text_generator::{TextGenerator, TextGeneratorFactory};
