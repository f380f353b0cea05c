use std::sync::{Arc, Mutex};

use crate::domain::GenerationError;
use crate::ports::{TextGenerator, TextGeneratorFactory};

/// Replays scripted results and records every instruction it receives.
#[derive(Clone, Default)]
pub struct FakeTextGenerator {
    pub instructions: Arc<Mutex<Vec<String>>>,
    pub responses: Arc<Mutex<Vec<Result<String, GenerationError>>>>,
}

impl FakeTextGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        let fake = Self::default();
        fake.push(Ok(text.into()));
        fake
    }

    pub fn failing(error: GenerationError) -> Self {
        let fake = Self::default();
        fake.push(Err(error));
        fake
    }

    pub fn push(&self, response: Result<String, GenerationError>) {
        self.responses.lock().unwrap().push(response);
    }

    pub fn received(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }
}

impl TextGenerator for FakeTextGenerator {
    fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        self.instructions.lock().unwrap().push(instruction.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(GenerationError::unavailable("fake: no scripted response", Some(500)));
        }
        responses.remove(0)
    }
}

/// Hands out the same fake, or reports the gateway as unconfigured.
#[derive(Clone)]
pub struct FakeTextGeneratorFactory {
    generator: Option<FakeTextGenerator>,
}

impl FakeTextGeneratorFactory {
    pub fn new(generator: FakeTextGenerator) -> Self {
        Self { generator: Some(generator) }
    }

    pub fn unconfigured() -> Self {
        Self { generator: None }
    }
}

impl TextGeneratorFactory for FakeTextGeneratorFactory {
    fn create(&self) -> Result<Arc<dyn TextGenerator>, GenerationError> {
        match &self.generator {
            Some(generator) => Ok(Arc::new(generator.clone())),
            None => Err(GenerationError::GenerationGatewayUnconfigured("GOOGLE_API_KEY".into())),
        }
    }
}
