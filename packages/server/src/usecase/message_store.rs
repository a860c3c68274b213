//! Message Store
//!
//! ルームの `MessageLog` への変更と、その後の永続化をまとめて行うサービス。
//! 呼び出し側はルームのロックを保持したまま呼ぶため、同じルームの保存は変更に対して直列化される。
//!
//! 永続化はベストエフォート：保存に失敗してもメモリ上の変更とブロードキャストは止めない。

use std::sync::Arc;

use crate::domain::{
    ChatMessage, DisplayName, Emoji, MessageArchive, MessageId, MessageStoreError, MessageText,
    Reactions, Room,
};

pub struct MessageStore {
    archive: Arc<dyn MessageArchive>,
}

impl MessageStore {
    pub fn new(archive: Arc<dyn MessageArchive>) -> Self {
        Self { archive }
    }

    /// Append to the room's log (evicting the oldest past the limit) and persist.
    ///
    /// Returns the message as stored, with its final id.
    pub async fn append(&self, room: &mut Room, mut message: ChatMessage) -> ChatMessage {
        room.messages().ensure_unique_id(&mut message);
        let stored = message.clone();
        let evicted = room.messages_mut().append(message);
        if !evicted.is_empty() {
            tracing::debug!(
                "Evicted {} message(s) from room '{}'",
                evicted.len(),
                room.name
            );
        }
        self.persist(room).await;
        stored
    }

    pub async fn edit_text(
        &self,
        room: &mut Room,
        id: &MessageId,
        text: MessageText,
        requester: &DisplayName,
        is_admin: bool,
    ) -> Result<ChatMessage, MessageStoreError> {
        let updated = room
            .messages_mut()
            .edit_text(id, text, requester, is_admin)?
            .clone();
        self.persist(room).await;
        Ok(updated)
    }

    pub async fn delete(
        &self,
        room: &mut Room,
        id: &MessageId,
        requester: &DisplayName,
        is_admin: bool,
    ) -> Result<ChatMessage, MessageStoreError> {
        let removed = room.messages_mut().delete(id, requester, is_admin)?;
        self.persist(room).await;
        Ok(removed)
    }

    pub async fn toggle_reaction(
        &self,
        room: &mut Room,
        id: &MessageId,
        emoji: Emoji,
        requester: &DisplayName,
    ) -> Result<Reactions, MessageStoreError> {
        let reactions = room
            .messages_mut()
            .toggle_reaction(id, emoji, requester)?
            .clone();
        self.persist(room).await;
        Ok(reactions)
    }

    pub fn history(&self, room: &Room) -> Vec<ChatMessage> {
        room.messages().history()
    }

    async fn persist(&self, room: &Room) {
        let messages = room.messages().history();
        if let Err(e) = self.archive.save(&room.name, &messages).await {
            // The archive has already logged the failure in detail
            tracing::warn!(
                "Continuing without a durable copy of room '{}': {}",
                room.name,
                e
            );
        }
    }
}
