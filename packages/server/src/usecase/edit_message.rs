//! UseCase: メッセージ編集
//!
//! 作者本人、またはルーム管理者だけが編集できる。編集後は `edited` が立つ。

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, MessageId, MessagePusher, MessageText, RoomName, RoomRepository,
    ServerEvent, policy,
};

use super::{
    error::SessionError,
    message_store::MessageStore,
    room_access::{bound_name, broadcast, lock_joined_room},
};

pub struct EditMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    message_store: Arc<MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl EditMessageUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_store: Arc<MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_store,
            message_pusher,
        }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        message_id: MessageId,
        text: MessageText,
    ) -> Result<ChatMessage, SessionError> {
        let mut room = lock_joined_room(self.repository.as_ref(), connection_id, room_name).await?;
        let requester = bound_name(&room, connection_id)?;
        let is_admin = policy::can_moderate(&room, connection_id);

        let updated = self
            .message_store
            .edit_text(&mut room, &message_id, text, &requester, is_admin)
            .await?;
        tracing::debug!("'{}' edited '{}' in room '{}'", requester, message_id, room_name);

        broadcast(
            self.message_pusher.as_ref(),
            &room.connection_ids(),
            ServerEvent::MessageEdited {
                message_id,
                text: updated.text.clone(),
            },
        )
        .await;
        Ok(updated)
    }
}
