//! HTTP surface: pages, JSON API and the session cookie.

mod api;
mod error;
mod pages;
mod session;

use std::net::SocketAddr;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::AppContext;
use crate::domain::AppError;

pub use session::SESSION_COOKIE;

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(pages::profile))
        .route("/login", get(pages::login))
        .route("/register", get(pages::register))
        .route("/assistant", get(pages::assistant))
        .route("/about", get(pages::about))
        .route("/feedback", get(pages::feedback))
        .route("/terms", get(pages::terms))
        .route("/privacy", get(pages::privacy))
        .route("/api/profile", get(api::get_profile).post(api::save_profile))
        .route("/api/register", post(api::register))
        .route("/api/login", post(api::login))
        .route("/api/logout", post(api::logout))
        .route("/api/assistant/context", get(api::context))
        .route("/api/assistant/generate", post(api::generate))
        .route("/api/assistant/render", post(api::render))
        .route("/api/assistant/export", post(api::export))
        .route("/api/feedback", post(api::submit_feedback))
        .fallback(pages::fallback)
        .layer(middleware::from_fn_with_state(ctx.clone(), session::resolve_session))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

pub async fn serve(ctx: AppContext, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "guidia listening");
    axum::serve(listener, router(ctx).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("guidia stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
