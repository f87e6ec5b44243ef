//! WebSocket upgrade handler for the live notification channel.
//!
//! Connection lifecycle:
//! 1. Verify the `token` query credential (401 before any upgrade)
//! 2. Upgrade and register a bounded queue for the user
//! 3. Forward queued events until either side goes away
//! 4. Unregister the queue
//!
//! Clearing the registry drops the queue's sender, which ends the forward
//! loop and closes the socket.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::adapters::http::middleware::auth_error_response;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::{ConnectionRegistry, LiveEvent, SessionValidator};

use super::messages::{now_rfc3339, ClientMessage, ConnectedMessage, ServerMessage};

/// Replies generated by the receive side (pongs, protocol errors).
const CONTROL_CAPACITY: usize = 8;

#[derive(Clone)]
pub struct LiveState {
    pub registry: Arc<dyn ConnectionRegistry>,
    pub validator: Arc<dyn SessionValidator>,
    pub channel_capacity: usize,
}

impl LiveState {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        validator: Arc<dyn SessionValidator>,
        channel_capacity: usize,
    ) -> Self {
        Self {
            registry,
            validator,
            channel_capacity: channel_capacity.max(2),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LiveParams {
    #[serde(default)]
    pub token: Option<String>,
}

/// GET /api/live?token=...
pub async fn live_handler(
    State(state): State<LiveState>,
    Query(params): Query<LiveParams>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        return auth_error_response(&AuthError::InvalidToken);
    };

    let user = match state.validator.validate(&token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, "live channel credential rejected");
            return auth_error_response(&e);
        }
    };

    match upgrade {
        Ok(ws) => ws.on_upgrade(move |socket| run_channel(socket, user, state)),
        Err(rejection) => rejection.into_response(),
    }
}

async fn run_channel(socket: WebSocket, user: AuthenticatedUser, state: LiveState) {
    let (events_tx, mut events_rx) = mpsc::channel::<LiveEvent>(state.channel_capacity);
    let connection_id = state.registry.register(&user.id, events_tx).await;
    tracing::info!(user_id = %user.id, connection_id = %connection_id, "live channel opened");

    let (mut sender, mut receiver) = socket.split();

    let connected = ServerMessage::Connected(ConnectedMessage {
        user_id: user.id.to_string(),
        connection_id: connection_id.to_string(),
        timestamp: now_rfc3339(),
    });
    if let Err(e) = send_message(&mut sender, &connected).await {
        tracing::debug!(connection_id = %connection_id, "client left before ack: {}", e);
        let _ = state.registry.unregister(&user.id, connection_id).await;
        return;
    }

    let (control_tx, mut control_rx) = mpsc::channel::<ServerMessage>(CONTROL_CAPACITY);

    let mut send_task = tokio::spawn(async move {
        loop {
            let outgoing = tokio::select! {
                event = events_rx.recv() => match event {
                    Some(event) => ServerMessage::from(event),
                    None => break,
                },
                reply = control_rx.recv() => match reply {
                    Some(reply) => reply,
                    None => break,
                },
            };
            if let Err(e) = send_message(&mut sender, &outgoing).await {
                tracing::debug!(connection_id = %connection_id, "send failed: {}", e);
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    let reply = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Ping) => ServerMessage::pong(),
                        Err(_) => ServerMessage::error("INVALID_MESSAGE", "Unrecognised message"),
                    };
                    if control_tx.send(reply).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(connection_id = %connection_id, "binary frame ignored");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Already gone if the registry was cleared.
    if let Err(e) = state.registry.unregister(&user.id, connection_id).await {
        tracing::debug!("{}", e);
    }
    tracing::info!(user_id = %user.id, connection_id = %connection_id, "live channel closed");
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

pub fn live_routes(state: LiveState) -> Router {
    Router::new().route("/", get(live_handler)).with_state(state)
}
