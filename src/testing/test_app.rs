use std::sync::Arc;

use crate::adapters::MemorySessionStore;
use crate::app::AppContext;
use crate::domain::profile::{InstitutionRow, Level, ProfileForm, SchoolContext};
use crate::domain::{GuidiaConfig, SessionId};

use super::{FakeExporter, FakeTextGenerator, FakeTextGeneratorFactory};

/// Context wired with fakes and a fresh in-memory session.
pub struct TestApp {
    pub ctx: AppContext,
    pub session: SessionId,
    pub generator: FakeTextGenerator,
    pub exporter: FakeExporter,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(FakeTextGenerator::default(), FakeExporter::default())
    }

    pub fn with(generator: FakeTextGenerator, exporter: FakeExporter) -> Self {
        let sessions = Arc::new(MemorySessionStore::new());
        let session = crate::ports::SessionStore::create(sessions.as_ref());
        let ctx = AppContext::new(
            sessions,
            Arc::new(FakeTextGeneratorFactory::new(generator.clone())),
            Arc::new(exporter.clone()),
            &GuidiaConfig::default(),
        )
        .unwrap();
        Self { ctx, session, generator, exporter }
    }
}

pub fn sample_profile_form() -> ProfileForm {
    ProfileForm {
        name: "Nahuel".into(),
        surname: "Ghilardi".into(),
        email: Some("nahuel@example.com".into()),
        institutions: vec![InstitutionRow {
            id: None,
            name: "Escuela 1-234".into(),
            levels: Some(vec![Level::Primary, Level::Secondary]),
            context: Some(SchoolContext::Rural),
        }],
    }
}
