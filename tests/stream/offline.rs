use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use url::Url;

use crate::common;
use tiingo_rs::{StreamBuilder, StreamState, TiingoError};

/// What the fake server saw: the request path, the first (subscription) frame and
/// whether the client sent a close frame (on its own or in reply to ours).
struct Seen {
    path: String,
    subscribe: Value,
    closed_by_client: bool,
}

/// Accept one connection, record the handshake, push `messages` (with a ping in the
/// middle) and either close or keep the socket open until the client closes.
async fn fake_server(messages: Vec<String>, close: bool) -> (SocketAddr, JoinHandle<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let join = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut path = String::new();
        let ws = tokio_tungstenite::accept_hdr_async(
            tcp,
            |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                path = req.uri().path().to_string();
                Ok(resp)
            },
        )
        .await
        .unwrap();
        let (mut write, mut read) = ws.split();

        let first = read.next().await.unwrap().unwrap();
        let subscribe: Value = serde_json::from_str(first.to_text().unwrap()).unwrap();

        let half = messages.len() / 2;
        for (i, msg) in messages.into_iter().enumerate() {
            if i == half {
                write.send(Message::Ping(b"hb".to_vec().into())).await.unwrap();
            }
            write.send(Message::Text(msg.into())).await.unwrap();
        }

        let mut closed_by_client = false;
        if close {
            write.send(Message::Close(None)).await.unwrap();
            closed_by_client = matches!(read.next().await, Some(Ok(Message::Close(_))));
        } else {
            while let Some(Ok(msg)) = read.next().await {
                if msg.is_close() {
                    closed_by_client = true;
                    break;
                }
            }
        }
        Seen {
            path,
            subscribe,
            closed_by_client,
        }
    });

    (addr, join)
}

fn ws_base(addr: SocketAddr) -> Url {
    Url::parse(&format!("ws://{addr}")).unwrap()
}

fn collector() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |msg: String| sink.lock().unwrap().push(msg))
}

#[tokio::test]
async fn subscribes_then_delivers_every_message_in_order() {
    let messages: Vec<String> = (0..6)
        .map(|i| format!(r#"{{"messageType":"A","data":["Q","spy",{i}]}}"#))
        .collect();
    let (addr, server) = fake_server(messages.clone(), true).await;
    let (received, handler) = collector();

    let session = StreamBuilder::new()
        .config(json!({
            "eventName": "subscribe",
            "authorization": common::API_KEY,
            "eventData": { "thresholdLevel": 5 }
        }))
        .channel("iex")
        .on_message(handler)
        .api_key_env(common::UNSET_ENV)
        .base_url(ws_base(addr))
        .build()
        .unwrap();
    let state = session.state();

    session.run().await.unwrap();
    let seen = server.await.unwrap();

    assert_eq!(seen.path, "/iex");
    assert_eq!(
        seen.subscribe,
        json!({
            "eventName": "subscribe",
            "authorization": common::API_KEY,
            "eventData": { "thresholdLevel": 5 }
        })
    );
    assert_eq!(*received.lock().unwrap(), messages);
    assert_eq!(*state.borrow(), StreamState::Closed);
}

#[tokio::test]
async fn stop_sends_a_close_frame() {
    let (addr, server) = fake_server(vec![r#"{"messageType":"H"}"#.to_string()], false).await;
    let (received, handler) = collector();

    let session = StreamBuilder::new()
        .config(json!({ "eventName": "subscribe", "authorization": common::API_KEY }))
        .channel("fx")
        .on_message(handler)
        .base_url(ws_base(addr))
        .build()
        .unwrap();
    let mut state = session.state();
    let handle = session.spawn();

    tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| *s == StreamState::Running),
    )
    .await
    .expect("first message delivered")
    .unwrap();

    handle.stop().await.unwrap();
    let seen = server.await.unwrap();

    assert_eq!(seen.path, "/fx");
    assert!(seen.closed_by_client);
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn peer_close_ends_a_spawned_session() {
    let (addr, server) = fake_server(Vec::new(), true).await;
    let (received, handler) = collector();

    let handle = StreamBuilder::new()
        .config(json!({ "authorization": common::API_KEY }))
        .channel("crypto")
        .on_message(handler)
        .base_url(ws_base(addr))
        .build()
        .unwrap()
        .spawn();

    tokio::time::timeout(Duration::from_secs(5), handle.wait())
        .await
        .expect("session ends when the server closes")
        .unwrap();
    let seen = server.await.unwrap();
    assert_eq!(seen.path, "/crypto");
    assert!(seen.closed_by_client, "close handshake completed");
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn connection_failure_is_returned() {
    // bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = StreamBuilder::new()
        .config(json!({ "authorization": common::API_KEY }))
        .channel("iex")
        .on_message(|_| {})
        .base_url(ws_base(addr))
        .build()
        .unwrap();
    let state = session.state();

    let err = session.run().await.unwrap_err();
    assert!(matches!(err, TiingoError::Websocket(_)), "{err}");
    assert!(err.is_transport());
    assert_eq!(*state.borrow(), StreamState::Closed);
}

#[test]
fn validation_happens_before_connecting() {
    let err = StreamBuilder::new()
        .channel("iex")
        .on_message(|_| {})
        .api_key_env(common::UNSET_ENV)
        .build()
        .unwrap_err();
    assert!(matches!(err, TiingoError::Configuration(_)));

    let authorized = || StreamBuilder::new().config(json!({ "authorization": common::API_KEY }));

    let err = authorized().channel("").on_message(|_| {}).build().unwrap_err();
    assert!(matches!(err, TiingoError::InvalidChannel(_)));
    assert!(err.to_string().contains("iex, fx, crypto"));

    let err = authorized().channel("options").on_message(|_| {}).build().unwrap_err();
    assert!(matches!(err, TiingoError::InvalidChannel(ref c) if c == "options"));

    let err = authorized().channel("iex").build().unwrap_err();
    assert!(matches!(err, TiingoError::MissingParameter(_)));
}
