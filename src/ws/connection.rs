//! WebSocket connection state machine.
//!
//! Each connection gets its own subscriber ID and an unbounded channel
//! registered with the [`RealtimeNotifier`] per subscribed animal.
//! Events arriving on the channel are forwarded to the client; when the
//! socket closes, every registration for this subscriber is dropped.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use crate::domain::{AnimalId, RealtimeNotifier};

/// Runs the read/write loop for a single WebSocket connection.
pub async fn run_connection(socket: WebSocket, notifier: Arc<RealtimeNotifier>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let client_id = uuid::Uuid::new_v4();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    tracing::debug!(%client_id, "ws connection opened");

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response =
                            handle_text_message(&text, &notifier, client_id, &event_tx).await;
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event published for one of the subscribed animals
            event = event_rx.recv() => {
                let Some(animal_event) = event else { break };
                let msg = WsMessage {
                    id: uuid::Uuid::new_v4().to_string(),
                    msg_type: WsMessageType::Event,
                    timestamp: chrono::Utc::now(),
                    payload: serde_json::to_value(&animal_event).unwrap_or_default(),
                };
                let json = serde_json::to_string(&msg).unwrap_or_default();
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    notifier.deregister_all(client_id).await;
    tracing::debug!(%client_id, "ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
async fn handle_text_message(
    text: &str,
    notifier: &RealtimeNotifier,
    client_id: uuid::Uuid,
    event_tx: &mpsc::UnboundedSender<crate::domain::AnimalEvent>,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = error_message(String::new(), 400, "malformed JSON");
        return serde_json::to_string(&err).ok();
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload.clone()) else {
        let err = error_message(msg.id, 404, "unknown command");
        return serde_json::to_string(&err).ok();
    };

    match command {
        WsCommand::Subscribe { animal_id } => {
            let animal_id = AnimalId::from_uuid(animal_id);
            notifier
                .register(animal_id, client_id, event_tx.clone())
                .await;
            let response = WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "subscribed": RealtimeNotifier::topic(animal_id),
                }),
            };
            serde_json::to_string(&response).ok()
        }
        WsCommand::Unsubscribe { animal_id } => {
            let animal_id = AnimalId::from_uuid(animal_id);
            let removed = notifier.deregister(animal_id, client_id).await;
            let response = WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "unsubscribed": RealtimeNotifier::topic(animal_id),
                    "removed": removed,
                }),
            };
            serde_json::to_string(&response).ok()
        }
    }
}

fn error_message(id: String, code: u32, message: &str) -> WsMessage {
    WsMessage {
        id,
        msg_type: WsMessageType::Error,
        timestamp: chrono::Utc::now(),
        payload: serde_json::json!({
            "code": code,
            "message": message,
        }),
    }
}
