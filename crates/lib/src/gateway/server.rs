//! Gateway HTTP server (axum).

use crate::catalog::{self, fetch_active_catalog, CatalogItem, CatalogStore};
use crate::config::Config;
use crate::handler::EventHandler;
use crate::line::{LineClient, WebhookBody};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;

const LIVENESS_TEXT: &str = "Hello from your LINE Bot backend! Server is running.";

/// Shared state for the gateway routes. Immutable; cloned per request.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<dyn CatalogStore>,
    pub handler: Arc<EventHandler>,
}

impl GatewayState {
    /// Wire store, LINE client and handler from config. Fails only when the catalog store is
    /// misconfigured; a missing LINE token disables replies with a warning.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = catalog::store_from_config(config).context("configuring catalog store")?;
        let line = LineClient::new(
            config.line.channel_access_token.clone(),
            config.line.api_base.clone(),
        );
        if !line.is_enabled() {
            log::warn!("LINE_TOKEN is not set; LINE replies are disabled");
        }
        let handler = EventHandler::new(
            store.clone(),
            Arc::new(line),
            config.features,
            Duration::from_millis(config.reply.pacing_ms),
        );
        Ok(Self {
            store,
            handler: Arc::new(handler),
        })
    }
}

/// Routes: `/`, `/webhook`, `/test-courses`.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/webhook", post(webhook))
        .route("/test-courses", get(test_courses))
        .with_state(state)
}

/// Run the gateway; binds to config.server.bind:config.server.port and blocks until shutdown
/// (Ctrl+C or SIGTERM).
pub async fn run_gateway(config: Config) -> Result<()> {
    let state = GatewayState::from_config(&config)?;
    log::info!(
        "catalog backend: {} (collection {})",
        state.store.name(),
        config.catalog.collection
    );
    let app = router(state);

    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
/// In-flight event tasks are detached and not awaited.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST /webhook — acknowledges with 200 "OK" before any event is processed; each event runs
/// in its own task. Only a body that is not JSON gets 400; malformed events are skipped.
async fn webhook(State(state): State<GatewayState>, body: Bytes) -> (StatusCode, &'static str) {
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("webhook: invalid body: {}", e);
            return (StatusCode::BAD_REQUEST, "Bad Request");
        }
    };
    let body: WebhookBody = serde_json::from_value(value).unwrap_or_default();
    let events = body.into_events();
    if !events.is_empty() {
        log::debug!("webhook: {} event(s)", events.len());
        let _ = state.handler.handle_batch(events);
    }
    (StatusCode::OK, "OK")
}

/// GET /test-courses — active catalog as JSON.
async fn test_courses(State(state): State<GatewayState>) -> Json<Vec<CatalogItem>> {
    Json(fetch_active_catalog(state.store.as_ref()).await)
}

/// GET / — static liveness text.
async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogBackend;

    #[test]
    fn state_requires_configured_store() {
        assert!(GatewayState::from_config(&Config::default()).is_err());
    }

    #[test]
    fn state_without_line_token_still_builds() {
        let mut config = Config::default();
        config.catalog.backend = CatalogBackend::File;
        let state = GatewayState::from_config(&config).unwrap();
        assert_eq!(state.store.name(), "file");
    }
}
