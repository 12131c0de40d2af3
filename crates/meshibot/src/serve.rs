// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `meshibot serve` command implementation.
//!
//! Builds the storage, directory client, and reply sink from configuration
//! and serves the inbound webhook plus read-only inspection endpoints on
//! axum.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use meshibot_config::MeshibotConfig;
use meshibot_core::{MeshibotError, ShopId, UserId};
use meshibot_directory::DirectoryClient;
use meshibot_storage::queries::{criteria, shops};
use meshibot_storage::Database;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::notify::HttpReplySink;
use crate::pipeline::Pipeline;

/// Shared state for axum request handlers.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
    db: Arc<Database>,
    start_time: std::time::Instant,
}

/// Inbound event envelope delivered by the chat-platform adapter.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum InboundEvent {
    /// A user (or group member) sent a text message.
    Message {
        user_id: String,
        text: String,
        reply_to: String,
    },
    /// A user followed the bot.
    Follow { reply_to: String },
    /// The bot was added to a group.
    Join { reply_to: String },
}

#[derive(Debug, Serialize)]
struct AckResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct CriteriaParams {
    user_id: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(e: &MeshibotError) -> Response {
    let status = match e {
        MeshibotError::NotFound { .. } => StatusCode::NOT_FOUND,
        MeshibotError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// POST /events
///
/// The pipeline replies through the notification sink, not through this
/// response; delivery problems are already handled (and logged) inside, so
/// the webhook always acknowledges.
async fn post_events(State(state): State<AppState>, Json(event): Json<InboundEvent>) -> Response {
    match event {
        InboundEvent::Message {
            user_id,
            text,
            reply_to,
        } => {
            state
                .pipeline
                .handle_message(&UserId(user_id), &text, &reply_to)
                .await;
        }
        InboundEvent::Follow { reply_to } | InboundEvent::Join { reply_to } => {
            state.pipeline.handle_follow(&reply_to).await;
        }
    }
    Json(AckResponse { status: "ok" }).into_response()
}

/// GET /criteria?user_id=
async fn get_criteria(
    State(state): State<AppState>,
    Query(params): Query<CriteriaParams>,
) -> Response {
    match criteria::get(&state.db, &UserId(params.user_id)).await {
        Ok(criteria) => Json(criteria).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /shops/{id}
async fn get_shop(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let shop_id = ShopId(id);
    match shops::get(&state.db, &shop_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => error_response(&MeshibotError::NotFound {
            entity: "shop",
            key: shop_id.as_str().to_string(),
        }),
        Err(e) => error_response(&e),
    }
}

/// GET /health
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/events", post(post_events))
        .route("/criteria", get(get_criteria))
        .route("/shops/{id}", get(get_shop))
        .route("/health", get(get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the `meshibot serve` command.
pub async fn run_serve(config: MeshibotConfig) -> Result<(), MeshibotError> {
    init_tracing(&config.agent.log_level);
    info!("starting meshibot serve");

    let db = Arc::new(Database::open(&config.storage.database_path).await?);
    info!(path = %config.storage.database_path, "storage ready");

    // Validation guarantees these are present at serve time.
    let api_key = config
        .directory
        .api_key
        .clone()
        .ok_or_else(|| MeshibotError::Config("directory.api_key is required".into()))?;
    let reply_url = config
        .notify
        .reply_url
        .clone()
        .ok_or_else(|| MeshibotError::Config("notify.reply_url is required".into()))?;

    let directory = DirectoryClient::new(
        api_key,
        config.directory.region.clone(),
        config.directory.max_result_pages,
        config.directory.budget_grade_range,
    )?;
    let sink = Arc::new(HttpReplySink::new(reply_url)?);

    let pipeline = Arc::new(Pipeline::new(db.clone(), directory, sink, config.clone()));
    let state = AppState {
        pipeline,
        db,
        start_time: std::time::Instant::now(),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MeshibotError::Internal(format!("failed to bind to {addr}: {e}")))?;
    info!("listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MeshibotError::Internal(format!("server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("meshibot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_event_deserializes() {
        let json = r#"{
            "type": "message",
            "user_id": "U-1",
            "text": "+新橋",
            "reply_to": "rt-abc"
        }"#;
        let event: InboundEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(
            event,
            InboundEvent::Message { ref text, .. } if text == "+新橋"
        ));
    }

    #[test]
    fn lifecycle_events_deserialize() {
        let follow: InboundEvent =
            serde_json::from_str(r#"{"type": "follow", "reply_to": "rt-1"}"#).unwrap();
        assert!(matches!(follow, InboundEvent::Follow { .. }));

        let join: InboundEvent =
            serde_json::from_str(r#"{"type": "join", "reply_to": "rt-2"}"#).unwrap();
        assert!(matches!(join, InboundEvent::Join { .. }));
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let result =
            serde_json::from_str::<InboundEvent>(r#"{"type": "sticker", "reply_to": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn error_statuses_map_by_variant() {
        let not_found = MeshibotError::NotFound {
            entity: "shop",
            key: "J1".into(),
        };
        assert_eq!(
            error_response(&not_found).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&MeshibotError::Validation("x".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_response(&MeshibotError::Internal("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
