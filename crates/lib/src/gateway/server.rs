//! Gateway HTTP server: Mista webhooks and a health probe.

use crate::channels::mista::{self, InboundPayload, MistaError, StatusPayload};
use crate::channels::{ChannelConfig, ChannelEvent, ChannelRegistry};
use crate::config::{self, Config};
use crate::gateway::protocol::WebhookResponse;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

const EVENT_QUEUE_SIZE: usize = 256;

type Reply = (StatusCode, Json<WebhookResponse>);

/// Shared state for webhook handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub registry: ChannelRegistry,
    /// Accepted events go to the host processor.
    pub event_tx: mpsc::Sender<ChannelEvent>,
}

/// Build the webhook router. Routes are `/c/mx/{uuid}/{action}`.
pub fn router(state: GatewayState) -> Router {
    let base = format!("/c/{}/:uuid", mista::CHANNEL_TYPE);
    Router::new()
        .route("/", get(health_http))
        .route(&format!("{}/receive", base), post(receive_message))
        .route(&format!("{}/callback", base), post(receive_message))
        .route(&format!("{}/status", base), post(receive_status))
        .route(&format!("{}/delivery", base), post(receive_status))
        .with_state(state)
}

/// Run the gateway until SIGINT/SIGTERM. Accepted events are logged by an in-process processor.
pub async fn run_gateway(config: Config) -> Result<()> {
    let registry = config::build_registry(&config);
    if registry.is_empty() {
        log::warn!("no channels configured; every webhook will be answered 404");
    }
    let (event_tx, mut event_rx) = mpsc::channel::<ChannelEvent>(EVENT_QUEUE_SIZE);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            process_event(event);
        }
    });

    let state = GatewayState { registry, event_tx };
    let app = router(state);

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

fn process_event(event: ChannelEvent) {
    match event {
        ChannelEvent::Message { msg_uuid, msg } => log::info!(
            "channel {}: msg {} from {} (external id {})",
            msg.channel_uuid,
            msg_uuid,
            msg.urn,
            msg.external_id
        ),
        ChannelEvent::Status(status) => log::info!(
            "channel {}: external id {} is {}",
            status.channel_uuid,
            status.external_id,
            status.status
        ),
    }
}

/// Future that completes on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// Merge query parameters and a form-encoded body (body wins) and decode into `T`.
fn decode_form<T: DeserializeOwned>(query: HashMap<String, String>, body: &[u8]) -> Result<T, String> {
    let mut fields: serde_json::Map<String, serde_json::Value> = query
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect();
    for (k, v) in url::form_urlencoded::parse(body) {
        fields.insert(k.into_owned(), serde_json::Value::String(v.into_owned()));
    }
    serde_json::from_value(serde_json::Value::Object(fields)).map_err(|e| e.to_string())
}

fn lookup_channel(state: &GatewayState, uuid: &str) -> Result<Arc<ChannelConfig>, Reply> {
    state.registry.get(uuid).ok_or_else(|| {
        log::warn!("webhook for unknown channel {}", uuid);
        (
            StatusCode::NOT_FOUND,
            Json(WebhookResponse::err(format!("channel not found: {}", uuid))),
        )
    })
}

fn rejected(channel: &ChannelConfig, err: &MistaError) -> Reply {
    log::warn!("channel {}: webhook rejected: {}", channel.uuid(), err);
    (
        StatusCode::BAD_REQUEST,
        Json(WebhookResponse::err(err.to_string())),
    )
}

fn queue_closed() -> Reply {
    log::error!("event processor is gone, refusing webhook");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(WebhookResponse::err("event processor unavailable")),
    )
}

/// POST /c/mx/{uuid}/receive (or /callback) — mobile-originated message.
async fn receive_message(
    State(state): State<GatewayState>,
    Path(channel_uuid): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Reply {
    let channel = match lookup_channel(&state, &channel_uuid) {
        Ok(c) => c,
        Err(reply) => return reply,
    };
    let payload: InboundPayload = match decode_form(query, &body) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("channel {}: undecodable message form: {}", channel_uuid, e);
            return (StatusCode::BAD_REQUEST, Json(WebhookResponse::err(e)));
        }
    };
    let msg = match mista::build_inbound_message(&channel, &payload) {
        Ok(m) => m,
        Err(e) => return rejected(&channel, &e),
    };
    let msg_uuid = uuid::Uuid::new_v4();
    let response = WebhookResponse::msg(msg_uuid, &msg);
    log::debug!("channel {}: accepted msg {} ({})", channel_uuid, msg_uuid, msg.external_id);
    if state
        .event_tx
        .send(ChannelEvent::Message { msg_uuid, msg })
        .await
        .is_err()
    {
        return queue_closed();
    }
    (StatusCode::OK, Json(response))
}

/// POST /c/mx/{uuid}/status (or /delivery) — delivery report.
async fn receive_status(
    State(state): State<GatewayState>,
    Path(channel_uuid): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Reply {
    let channel = match lookup_channel(&state, &channel_uuid) {
        Ok(c) => c,
        Err(reply) => return reply,
    };
    let payload: StatusPayload = match decode_form(query, &body) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("channel {}: undecodable status form: {}", channel_uuid, e);
            return (StatusCode::BAD_REQUEST, Json(WebhookResponse::err(e)));
        }
    };
    let status = match mista::build_status(&channel, &payload) {
        Ok(s) => s,
        Err(e) => return rejected(&channel, &e),
    };
    let response = WebhookResponse::status(&status);
    log::debug!(
        "channel {}: accepted status {} for {}",
        channel_uuid,
        status.status,
        status.external_id
    );
    if state.event_tx.send(ChannelEvent::Status(status)).await.is_err() {
        return queue_closed();
    }
    (StatusCode::OK, Json(response))
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "channels": state.registry.len(),
    }))
}
