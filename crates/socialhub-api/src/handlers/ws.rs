//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{FromRequestParts, Query, State, WebSocketUpgrade};
use axum::http::request::Parts;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use socialhub_core::error::AppError;

use crate::auth::{Claims, decode_token};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: Option<String>,
}

/// Token authentication for the WebSocket endpoint.
///
/// Runs before the upgrade extractor, so an anonymous or invalid token
/// is rejected with 401 and the connection never reaches the Open
/// state.
pub struct WsAuth(pub Claims);

impl FromRequestParts<AppState> for WsAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<WsQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::unauthorized("Missing token"))?;
        let token = query
            .token
            .ok_or_else(|| AppError::unauthorized("Missing token"))?;
        let claims = decode_token(&state.config.auth, &token)?;
        Ok(WsAuth(claims))
    }
}

/// GET /ws?token={jwt} — WebSocket upgrade.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    WsAuth(claims): WsAuth,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, claims, socket))
}

async fn handle_ws_connection(state: AppState, claims: Claims, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.connections.register(claims.sub, claims.username);
    let conn_id = handle.id;

    // Forward queued outbound frames to the socket. Exits when the
    // handle is marked dead (eviction, unregister) so an evicted
    // socket gets closed instead of lingering.
    let forward_handle = handle.clone();
    let outbound_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                frame = outbound_rx.recv() => {
                    let Some(frame) = frame else { break };
                    let text = match frame.to_json() {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(conn_id = %conn_id, error = %e, "Failed to serialize frame");
                            continue;
                        }
                    };
                    if ws_tx.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = forward_handle.closed() => break,
            }
        }
        let _ = ws_tx.close().await;
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.connections.handle_inbound(&handle, &text).await;
            }
            Ok(Message::Close(_)) => {
                break;
            }
            // Ping/pong control frames are answered by axum itself.
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    state.connections.unregister(&conn_id);
    outbound_task.abort();

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
