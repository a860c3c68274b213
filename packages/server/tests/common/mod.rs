//! In-process test server and WebSocket client helpers.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    domain::{DEFAULT_HISTORY_LIMIT, MessageArchive},
    infrastructure::{
        archive::InMemoryMessageArchive, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::Server,
    usecase::{GetRoomDetailUseCase, GetRoomHistoryUseCase, GetRoomsUseCase, SessionCoordinator},
};
use hiroba_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(200);

/// A server bound to an ephemeral port, shut down on drop
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(Arc::new(InMemoryMessageArchive::new()), false).await
    }

    pub async fn start_with(archive: Arc<dyn MessageArchive>, notify_rejections: bool) -> Self {
        let clock = Arc::new(SystemClock);
        let repository = Arc::new(InMemoryRoomRepository::new(
            archive.clone(),
            clock.clone(),
            DEFAULT_HISTORY_LIMIT,
        ));
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        let server = Server::new(
            Arc::new(SessionCoordinator::new(
                repository.clone(),
                archive,
                message_pusher,
                clock,
                notify_rejections,
            )),
            Arc::new(GetRoomsUseCase::new(repository.clone())),
            Arc::new(GetRoomDetailUseCase::new(repository.clone())),
            Arc::new(GetRoomHistoryUseCase::new(repository)),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Server failed");
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn client(&self) -> TestClient {
        TestClient::connect(&self.ws_url()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(url: &str) -> Self {
        let (ws, _) = connect_async(url)
            .await
            .expect("Failed to connect WebSocket");
        Self { ws }
    }

    pub async fn send(&mut self, event: Value) {
        self.ws
            .send(Message::text(event.to_string()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn send_raw(&mut self, frame: Message) {
        self.ws.send(frame).await.expect("Failed to send frame");
    }

    /// Next JSON frame
    pub async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
        }
    }

    /// Next frame of the given `type`, skipping others
    pub async fn recv_type(&mut self, kind: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["type"] == kind {
                return frame;
            }
        }
    }

    /// Join and consume the joiner's own `history` / notice / membership frames
    pub async fn join(&mut self, username: &str, room: &str) -> Vec<Value> {
        self.send(json!({"type": "join", "username": username, "room": room}))
            .await;
        let mut frames = Vec::new();
        loop {
            let frame = self.recv().await;
            let done = frame["type"] == "membershipUpdate";
            frames.push(frame);
            if done {
                return frames;
            }
        }
    }

    /// Assert nothing arrives for a short while
    pub async fn expect_silence(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(SILENCE_WINDOW, self.ws.next()).await
        {
            panic!("Expected no frame, got {}", text.as_str());
        }
    }

    /// Assert the server closes the connection
    pub async fn expect_closed(&mut self) {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("Timed out waiting for close");
            match next {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(Message::Text(text))) => {
                    panic!("Expected close, got {}", text.as_str())
                }
                Some(Ok(_)) => {}
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
