//! WebSocket tests against a live server on an ephemeral port.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use beverage_tally::api;
use beverage_tally::app_state::AppState;

const PASSWORD: &str = "ws-secret";

type Socket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn start_server() -> SocketAddr {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    let app = api::build_app(AppState::in_memory(PASSWORD));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn connect(addr: SocketAddr) -> Socket {
    let Ok((socket, _)) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };
    socket
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_secs(5), socket.next()).await
        else {
            panic!("no ws message within timeout");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("non-json ws frame: {text}");
            };
            return value;
        }
    }
}

async fn command(socket: &mut Socket, id: &str, payload: Value) -> Value {
    let frame = json!({ "id": id, "type": "command", "payload": payload });
    if socket.send(Message::text(frame.to_string())).await.is_err() {
        panic!("ws send failed");
    }
    next_json(socket).await
}

async fn login(client: &reqwest::Client, addr: SocketAddr) {
    let resp = client
        .post(format!("http://{addr}/api/v1/session/login"))
        .json(&json!({ "password": PASSWORD }))
        .send()
        .await;
    let Ok(resp) = resp else {
        panic!("login request failed");
    };
    assert!(resp.status().is_success());
}

#[tokio::test]
async fn subscriber_receives_servings_for_its_beverages() {
    let addr = start_server().await;
    let mut socket = connect(addr).await;

    let reply = command(
        &mut socket,
        "sub-1",
        json!({ "command": "subscribe", "beverage_ids": ["hugo"] }),
    )
    .await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["id"], "sub-1");
    assert_eq!(reply["payload"]["count"], 1);

    let client = reqwest::Client::new();
    login(&client, addr).await;

    // Not subscribed: must not arrive before the hugo serving.
    let _ = client
        .post(format!("http://{addr}/api/v1/beverages/mojito/servings"))
        .json(&json!({ "amount": 1 }))
        .send()
        .await;
    let resp = client
        .post(format!("http://{addr}/api/v1/beverages/hugo/servings"))
        .json(&json!({ "amount": 2 }))
        .send()
        .await;
    assert!(resp.is_ok_and(|r| r.status().is_success()));

    let event = next_json(&mut socket).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["eventType"], "serving_added");
    assert_eq!(event["payload"]["beverageId"], "hugo");
    assert_eq!(event["payload"]["count"], 2);
    assert_eq!(event["payload"]["totalServed"], 3);
}

#[tokio::test]
async fn event_level_changes_reach_every_connection() {
    let addr = start_server().await;
    let mut socket = connect(addr).await;

    let client = reqwest::Client::new();
    login(&client, addr).await;
    let resp = client
        .put(format!("http://{addr}/api/v1/event"))
        .json(&json!({ "name": "Launch" }))
        .send()
        .await;
    assert!(resp.is_ok_and(|r| r.status().is_success()));

    let event = next_json(&mut socket).await;
    assert_eq!(event["payload"]["eventType"], "event_details_updated");
    assert_eq!(event["payload"]["name"], "Launch");
}

#[tokio::test]
async fn get_state_and_bad_commands() {
    let addr = start_server().await;
    let mut socket = connect(addr).await;

    let reply = command(&mut socket, "s", json!({ "command": "get_state" })).await;
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["payload"]["totalServed"], 0);

    let reply = command(&mut socket, "x", json!({ "command": "explode" })).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], 404);

    if socket.send(Message::text("{ nope")).await.is_err() {
        panic!("ws send failed");
    }
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], 400);
}
