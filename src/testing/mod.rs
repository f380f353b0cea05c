mod fake_exporter;
mod fake_text_generator;
mod test_app;

pub use fake_exporter::FakeExporter;
pub use fake_text_generator::{FakeTextGenerator, FakeTextGeneratorFactory};
pub use test_app::{TestApp, sample_profile_form};
