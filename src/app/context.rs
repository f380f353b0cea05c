use std::sync::Arc;

use crate::adapters::templates::PageRenderer;
use crate::adapters::{EnvTextGeneratorFactory, MemorySessionStore, PdfExporter};
use crate::domain::config::ExportConfig;
use crate::domain::{AppError, GuidiaConfig, InstructionSettings};
use crate::ports::{DocumentExporter, SessionStore, TextGeneratorFactory};

/// Application context holding dependencies for command execution.
#[derive(Clone)]
pub struct AppContext {
    sessions: Arc<dyn SessionStore>,
    generators: Arc<dyn TextGeneratorFactory>,
    exporter: Arc<dyn DocumentExporter>,
    pages: Arc<PageRenderer>,
    settings: InstructionSettings,
    export: ExportConfig,
}

impl AppContext {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        generators: Arc<dyn TextGeneratorFactory>,
        exporter: Arc<dyn DocumentExporter>,
        config: &GuidiaConfig,
    ) -> Result<Self, AppError> {
        Ok(Self {
            sessions,
            generators,
            exporter,
            pages: Arc::new(PageRenderer::new()?),
            settings: config.assistant.instruction_settings(),
            export: config.export.clone(),
        })
    }

    /// Wire the production adapters for a configuration.
    pub fn from_config(config: &GuidiaConfig) -> Result<Self, AppError> {
        Self::new(
            Arc::new(MemorySessionStore::with_idle_ttl(config.server.session_idle_timeout())),
            Arc::new(EnvTextGeneratorFactory::new(config.gateway.clone())),
            Arc::new(PdfExporter::default()),
            config,
        )
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    /// Owned handle for work that may outlive the request.
    pub fn sessions_handle(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.sessions)
    }

    pub fn generators(&self) -> &dyn TextGeneratorFactory {
        self.generators.as_ref()
    }

    /// Owned handle for work moved onto the blocking pool.
    pub fn generators_handle(&self) -> Arc<dyn TextGeneratorFactory> {
        Arc::clone(&self.generators)
    }

    pub fn exporter(&self) -> &dyn DocumentExporter {
        self.exporter.as_ref()
    }

    pub fn pages(&self) -> &PageRenderer {
        &self.pages
    }

    pub fn settings(&self) -> &InstructionSettings {
        &self.settings
    }

    pub fn export_config(&self) -> &ExportConfig {
        &self.export
    }
}
