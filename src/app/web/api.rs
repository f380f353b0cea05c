//! JSON API handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::adapters::markdown::render_html;
use crate::app::AppContext;
use crate::app::commands::assistant::{self, GeneratedDocument};
use crate::app::commands::{auth, export, feedback, profile};
use crate::domain::context_selector::ContextOptions;
use crate::domain::feedback::FeedbackForm;
use crate::domain::session::{LoginForm, RegistrationForm};
use crate::domain::{
    AppError, AssistantForm, GenerationError, InstitutionId, Level, Profile, ProfileForm,
    RequiredField, SessionId, ValidationError,
};
use crate::ports::SessionStore;

use super::session::{CurrentSession, ensure_signed_in};

#[derive(Debug, Serialize)]
pub struct Ack {
    status: &'static str,
}

const OK: Ack = Ack { status: "ok" };

pub async fn save_profile(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<ProfileForm>,
) -> Result<Json<Profile>, AppError> {
    ensure_signed_in(&ctx, &session)?;
    Ok(Json(profile::save(&ctx, &session, &form)?))
}

pub async fn get_profile(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Option<Profile>>, AppError> {
    ensure_signed_in(&ctx, &session)?;
    Ok(Json(profile::get(&ctx, &session)?))
}

pub async fn register(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<RegistrationForm>,
) -> Result<Json<Ack>, AppError> {
    auth::register(&ctx, &session, &form)?;
    Ok(Json(OK))
}

pub async fn login(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<LoginForm>,
) -> Result<Json<Ack>, AppError> {
    auth::login(&ctx, &session, &form)?;
    Ok(Json(OK))
}

pub async fn logout(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Ack>, AppError> {
    ensure_signed_in(&ctx, &session)?;
    auth::logout(&ctx, &session)?;
    Ok(Json(OK))
}

#[derive(Debug, Deserialize)]
pub struct ContextQuery {
    institution: Option<String>,
    level: Option<String>,
}

pub async fn context(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<ContextQuery>,
) -> Result<Json<ContextOptions>, AppError> {
    ensure_signed_in(&ctx, &session)?;

    let institution = query
        .institution
        .filter(|id| !id.trim().is_empty())
        .map(|id| InstitutionId::from(id.as_str()))
        .ok_or(ValidationError::MissingField(RequiredField::Institution))?;
    let level = match query.level.as_deref().filter(|level| !level.trim().is_empty()) {
        None => None,
        Some(raw) => Some(Level::from_name(raw).ok_or_else(|| ValidationError::UnknownValue {
            field: "level",
            value: raw.to_string(),
        })?),
    };

    Ok(Json(assistant::context_options(&ctx, &session, &institution, level)?))
}

/// Clears the session's in-flight flag when the generation work ends,
/// whether or not the client is still waiting for it.
struct InFlight {
    sessions: Arc<dyn SessionStore>,
    session: SessionId,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.sessions.end_generation(&self.session);
    }
}

pub async fn generate(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<AssistantForm>,
) -> Result<Json<GeneratedDocument>, AppError> {
    ensure_signed_in(&ctx, &session)?;
    let instruction = assistant::prepare_instruction(&ctx, &session, &form)?;

    if !ctx.sessions().begin_generation(&session)? {
        return Err(GenerationError::GenerationInProgress.into());
    }
    let in_flight = InFlight { sessions: ctx.sessions_handle(), session };

    let generators = ctx.generators_handle();
    let document = tokio::task::spawn_blocking(move || {
        let _in_flight = in_flight;
        assistant::generate(generators.as_ref(), &instruction)
    })
    .await
    .map_err(|e| GenerationError::unavailable(format!("Generation task failed: {}", e), None))??;
    Ok(Json(document))
}

#[derive(Debug, Deserialize)]
pub struct MarkdownBody {
    #[serde(default)]
    markdown: String,
}

#[derive(Debug, Serialize)]
pub struct HtmlBody {
    html: String,
}

pub async fn render(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<MarkdownBody>,
) -> Result<Json<HtmlBody>, AppError> {
    ensure_signed_in(&ctx, &session)?;
    Ok(Json(HtmlBody { html: render_html(&body.markdown) }))
}

pub async fn export(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<MarkdownBody>,
) -> Result<Response, AppError> {
    ensure_signed_in(&ctx, &session)?;
    let document = export::export_document(ctx.exporter(), ctx.export_config(), &body.markdown)?;

    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    Ok((
        [(CONTENT_TYPE, document.content_type.to_string()), (CONTENT_DISPOSITION, disposition)],
        document.bytes,
    )
        .into_response())
}

pub async fn submit_feedback(
    State(ctx): State<AppContext>,
    CurrentSession(session): CurrentSession,
    Json(form): Json<FeedbackForm>,
) -> Result<Json<Ack>, AppError> {
    ensure_signed_in(&ctx, &session)?;
    feedback::submit(&form)?;
    Ok(Json(OK))
}
