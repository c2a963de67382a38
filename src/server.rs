pub mod cors;
pub mod handlers;

use crate::config::{ServiceMode, Settings};
use crate::shared::logging::append_service_log;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read bound address: {0}")]
    LocalAddr(#[source] std::io::Error),
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Startup configuration shared read-only by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    log_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let log_path = settings.service_log_path();
        Self {
            settings: Arc::new(settings),
            log_path,
        }
    }

    pub fn log(&self, level: &str, event: &str, message: &str) {
        if let Some(path) = &self.log_path {
            append_service_log(path, level, event, message);
        }
    }
}

pub fn build_router(settings: Settings) -> Router {
    router_for(AppState::new(settings))
}

/// `/today-session` is only routed in extended mode; CORS headers wrap every
/// response, fallbacks included.
fn router_for(state: AppState) -> Router {
    let mode = state.settings.mode();

    let mut router = Router::new().route(
        "/save-session",
        post(handlers::save_session).options(handlers::save_session_preflight),
    );
    if mode == ServiceMode::Extended {
        router = router.route("/today-session", get(handlers::today_session));
    }

    router
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(mode, cors::apply_cors_headers))
}

pub async fn serve(settings: Settings) -> Result<(), ServerError> {
    let addr = settings.bind;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let state = AppState::new(settings);
    state.log(
        "info",
        "service.start",
        &format!(
            "listening on {local_addr} in {} mode, inbox {}",
            state.settings.mode(),
            state.settings.inbox_dir.display()
        ),
    );

    axum::serve(listener, router_for(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
