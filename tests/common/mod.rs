//! Shared testing utilities for guidia integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use assert_cmd::Command;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use guidia::adapters::{MemorySessionStore, PdfExporter};
use guidia::app::AppContext;
use guidia::domain::GenerationError;
use guidia::ports::{TextGenerator, TextGeneratorFactory};
use guidia::{GuidiaConfig, SESSION_COOKIE};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Isolated working directory for CLI exercises.
pub struct TestContext {
    root: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self { root: TempDir::new().expect("Failed to create temp directory for tests") }
    }

    pub fn work_dir(&self) -> &Path {
        self.root.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Build a command for invoking the compiled `guidia` binary in the work directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("guidia").expect("Failed to locate guidia binary");
        cmd.current_dir(self.work_dir())
            .env_remove("GUIDIA_CONFIG")
            .env_remove("GOOGLE_API_KEY")
            .env("RUST_LOG", "off");
        cmd
    }
}

/// Generator that answers every instruction with the same text.
#[derive(Clone, Default)]
pub struct CannedGenerator {
    pub reply: String,
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl TextGenerator for CannedGenerator {
    fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        self.seen.lock().unwrap().push(instruction.to_string());
        Ok(self.reply.clone())
    }
}

/// Holds every call until released, counting the calls that started.
#[derive(Clone, Default)]
pub struct GatedGenerator {
    started: Arc<AtomicUsize>,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl GatedGenerator {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        let (open, opened) = &*self.gate;
        *open.lock().unwrap() = true;
        opened.notify_all();
    }

    pub async fn wait_started(&self, count: usize) {
        for _ in 0..500 {
            if self.started() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("generation {} never started", count);
    }
}

impl TextGenerator for GatedGenerator {
    fn generate(&self, _instruction: &str) -> Result<String, GenerationError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let (open, opened) = &*self.gate;
        let guard = open.lock().unwrap();
        let _released = opened
            .wait_timeout_while(guard, Duration::from_secs(10), |open| !*open)
            .unwrap();
        Ok("## Plan".to_string())
    }
}

/// Fails the first call with an upstream error, then succeeds.
#[derive(Clone, Default)]
pub struct FlakyGenerator {
    calls: Arc<AtomicUsize>,
}

impl TextGenerator for FlakyGenerator {
    fn generate(&self, _instruction: &str) -> Result<String, GenerationError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(GenerationError::unavailable("upstream down", Some(503)))
        } else {
            Ok("## Recovered".to_string())
        }
    }
}

pub enum CannedFactory {
    Ready(Arc<dyn TextGenerator>),
    Unconfigured,
}

impl TextGeneratorFactory for CannedFactory {
    fn create(&self) -> Result<Arc<dyn TextGenerator>, GenerationError> {
        match self {
            CannedFactory::Ready(generator) => Ok(Arc::clone(generator)),
            CannedFactory::Unconfigured => {
                Err(GenerationError::GenerationGatewayUnconfigured("GOOGLE_API_KEY".into()))
            }
        }
    }
}

/// A router plus the cookie of one browser session.
pub struct WebClient {
    router: axum::Router,
    cookie: Option<String>,
}

pub struct Reply {
    pub status: u16,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

impl WebClient {
    pub fn new(factory: CannedFactory) -> Self {
        Self::with_store(MemorySessionStore::new(), factory)
    }

    pub fn with_store(store: MemorySessionStore, factory: CannedFactory) -> Self {
        let ctx = AppContext::new(
            Arc::new(store),
            Arc::new(factory),
            Arc::new(PdfExporter::default()),
            &GuidiaConfig::default(),
        )
        .expect("context builds");
        Self { router: guidia::router_with(ctx), cookie: None }
    }

    pub fn with_generator(generator: impl TextGenerator + 'static) -> Self {
        Self::new(CannedFactory::Ready(Arc::new(generator)))
    }

    pub fn replying(text: &str) -> Self {
        Self::with_generator(CannedGenerator { reply: text.to_string(), ..Default::default() })
    }

    /// Same app and same browser session.
    pub fn fork(&self) -> Self {
        Self { router: self.router.clone(), cookie: self.cookie.clone() }
    }

    /// Same app, a client that has never been given a cookie.
    pub fn stranger(&self) -> Self {
        Self { router: self.router.clone(), cookie: None }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub async fn get(&mut self, uri: &str) -> Reply {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> Reply {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&mut self, mut request: Request<Body>) -> Reply {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, format!("{}={}", SESSION_COOKIE, cookie).parse().unwrap());
        }
        let response = self.router.clone().oneshot(request).await.unwrap();
        self.remember_cookie(&response);

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        Reply { status, headers, body }
    }

    fn remember_cookie(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let pair = value.split(';').next().unwrap_or_default();
            if let Some(id) = pair.strip_prefix(&format!("{}=", SESSION_COOKIE)) {
                self.cookie = Some(id.to_string());
            }
        }
    }

    /// Register and sign in the demo account.
    pub async fn sign_in(&mut self) {
        let registered = self
            .post(
                "/api/register",
                serde_json::json!({
                    "email": "ana@example.com",
                    "password": "pw",
                    "confirm_password": "pw"
                }),
            )
            .await;
        assert_eq!(registered.status, 200, "{}", registered.text());

        let signed_in = self
            .post("/api/login", serde_json::json!({"email": "ana@example.com", "password": "pw"}))
            .await;
        assert_eq!(signed_in.status, 200, "{}", signed_in.text());
    }

    /// Save a profile with one rural institution and return its id.
    pub async fn save_profile(&mut self) -> String {
        let saved = self
            .post(
                "/api/profile",
                serde_json::json!({
                    "name": "Nahuel",
                    "surname": "Ghilardi",
                    "institutions": [{
                        "name": "Escuela 1-234",
                        "levels": ["primary", "secondary"],
                        "context": "rural"
                    }]
                }),
            )
            .await;
        assert_eq!(saved.status, 200, "{}", saved.text());
        saved.json()["institutions"][0]["id"].as_str().expect("institution id").to_string()
    }
}
