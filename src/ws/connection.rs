//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::api::dto::LiveEventResponse;
use crate::domain::{BeverageId, TallyEvent};
use crate::service::TallyService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<TallyEvent>,
    tally_service: Arc<TallyService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs, &tally_service).await;
                        if ws_tx.send(Message::text(encode(&response))).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(tally_event) => {
                        if subs.matches(tally_event.beverage_id()) {
                            let msg = WsMessage::event(&tally_event);
                            if ws_tx.send(Message::text(encode(&msg))).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn encode(msg: &WsMessage) -> String {
    serde_json::to_string(msg).unwrap_or_default()
}

/// Splits raw ids into beverage ids and the wildcard flag.
fn parse_ids(raw: Vec<String>) -> (Vec<BeverageId>, bool) {
    let mut wildcard = false;
    let ids = raw
        .into_iter()
        .filter(|s| {
            if s == "*" {
                wildcard = true;
                false
            } else {
                !s.is_empty()
            }
        })
        .map(BeverageId::from)
        .collect();
    (ids, wildcard)
}

/// Handles a text message from the client and builds the reply.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    tally_service: &TallyService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command message");
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command");
    };

    match command {
        WsCommand::Subscribe { beverage_ids } => {
            let (ids, wildcard) = parse_ids(beverage_ids);
            subs.subscribe(&ids, wildcard);
            WsMessage::response(
                msg.id,
                serde_json::json!({
                    "subscribed": ids,
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::Unsubscribe { beverage_ids } => {
            let (ids, wildcard) = parse_ids(beverage_ids);
            subs.unsubscribe(&ids, wildcard);
            WsMessage::response(
                msg.id,
                serde_json::json!({
                    "unsubscribed": ids,
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::GetState => {
            let live = LiveEventResponse::from(tally_service.live_event().await);
            WsMessage::response(msg.id, serde_json::to_value(live).unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ids_extracts_wildcard() {
        let (ids, wildcard) = parse_ids(vec!["hugo".into(), "*".into(), String::new()]);
        assert!(wildcard);
        assert_eq!(ids, [BeverageId::new("hugo")]);
    }
}
