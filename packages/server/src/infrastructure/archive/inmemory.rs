//! InMemory MessageArchive 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageArchive, PersistenceError, RoomName};

/// Keeps the last saved snapshot of every room in memory.
#[derive(Default)]
pub struct InMemoryMessageArchive {
    rooms: Mutex<HashMap<RoomName, Vec<ChatMessage>>>,
}

impl InMemoryMessageArchive {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageArchive for InMemoryMessageArchive {
    async fn load(&self, room: &RoomName) -> Result<Vec<ChatMessage>, PersistenceError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room).cloned().unwrap_or_default())
    }

    async fn save(
        &self,
        room: &RoomName,
        messages: &[ChatMessage],
    ) -> Result<(), PersistenceError> {
        let mut rooms = self.rooms.lock().await;
        rooms.insert(room.clone(), messages.to_vec());
        Ok(())
    }
}
