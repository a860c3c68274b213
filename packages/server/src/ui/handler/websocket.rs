//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::ClientCommand,
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::{Session, SessionCoordinator},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards frames queued for this connection to its WebSocket.
///
/// The queue ends when the connection is unregistered (kick, disconnect). Whatever
/// was queued before that is still delivered, then the socket is closed.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let coordinator = state.session_coordinator.clone();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = coordinator.connect(tx).await;
    let mut send_task = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    handle_text(&coordinator, &mut session, text.as_str()).await;
                }
                Some(Ok(Message::Binary(_))) => {
                    coordinator
                        .reject_malformed(&session, "binary frames are not supported")
                        .await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("Connection '{}' requested close", session.connection_id());
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", session.connection_id(), e);
                    break;
                }
            },
            _ = &mut send_task => break,
        }
    }

    coordinator.disconnect(session).await;
    send_task.abort();
}

async fn handle_text(coordinator: &SessionCoordinator, session: &mut Session, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            coordinator.reject_malformed(session, &e.to_string()).await;
            return;
        }
    };
    let command = match ClientCommand::try_from(event) {
        Ok(command) => command,
        Err(e) => {
            coordinator.reject_malformed(session, &e.to_string()).await;
            return;
        }
    };
    tracing::debug!(
        "Connection '{}' sent '{}'",
        session.connection_id(),
        command.kind()
    );
    // Rejections are logged and reported by the coordinator
    let _ = coordinator.handle(session, command).await;
}
