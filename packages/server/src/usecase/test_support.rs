//! Shared fixtures for use case tests.

use std::sync::Arc;

use hiroba_shared::time::FixedClock;
use serde_json::Value;
use tokio::sync::mpsc;

use super::{join_room::JoinRoomUseCase, message_store::MessageStore};
use crate::{
    domain::{
        ConnectionId, DisplayName, MessageArchive, MessageId, MessagePusher, MessageText,
        RoomName, RoomRepository,
    },
    infrastructure::{
        archive::InMemoryMessageArchive, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
};

pub(crate) const NOW: i64 = 1_714_564_800_000;

pub(crate) struct TestContext {
    pub repository: Arc<dyn RoomRepository>,
    pub archive: Arc<dyn MessageArchive>,
    pub pusher: Arc<dyn MessagePusher>,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_archive(Arc::new(InMemoryMessageArchive::new()))
    }

    pub fn with_archive(archive: Arc<dyn MessageArchive>) -> Self {
        let clock = Arc::new(FixedClock::new(NOW));
        let repository = Arc::new(InMemoryRoomRepository::new(
            archive.clone(),
            clock.clone(),
            crate::domain::DEFAULT_HISTORY_LIMIT,
        ));
        Self {
            repository,
            archive,
            pusher: Arc::new(WebSocketMessagePusher::default()),
            clock,
        }
    }

    /// Register a fresh connection with the pusher
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        self.pusher.register_client(connection_id, tx).await;
        (connection_id, rx)
    }

    pub fn message_store(&self) -> Arc<MessageStore> {
        Arc::new(MessageStore::new(self.archive.clone()))
    }

    /// Connect and join `room_name` as `username`, discarding the join frames
    pub async fn joined(
        &self,
        username: &str,
        room_name: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (connection_id, mut rx) = self.connect().await;
        JoinRoomUseCase::new(
            self.repository.clone(),
            self.message_store(),
            self.pusher.clone(),
            self.clock.clone(),
        )
        .execute(connection_id, name(username), room(room_name), None)
        .await;
        drain(&mut rx);
        (connection_id, rx)
    }

    /// Drop queued frames on every receiver
    pub fn settle(receivers: &mut [&mut mpsc::UnboundedReceiver<String>]) {
        for rx in receivers.iter_mut() {
            drain(rx);
        }
    }
}

/// Everything currently queued for a connection, decoded as JSON
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).expect("frames are valid JSON"));
    }
    frames
}

/// `type` of every frame, in order
pub(crate) fn types(frames: &[Value]) -> Vec<String> {
    frames
        .iter()
        .map(|f| f["type"].as_str().unwrap_or_default().to_string())
        .collect()
}

pub(crate) fn name(s: &str) -> DisplayName {
    DisplayName::new(s.to_string()).unwrap()
}

pub(crate) fn room(s: &str) -> RoomName {
    RoomName::new(s.to_string()).unwrap()
}

pub(crate) fn text(s: &str) -> MessageText {
    MessageText::new(s.to_string()).unwrap()
}

pub(crate) fn message_id(s: &str) -> MessageId {
    MessageId::new(s.to_string()).unwrap()
}
