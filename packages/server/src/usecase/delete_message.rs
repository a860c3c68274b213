//! UseCase: メッセージ削除

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, MessageId, MessagePusher, RoomName, RoomRepository, ServerEvent,
    policy,
};

use super::{
    error::SessionError,
    message_store::MessageStore,
    room_access::{bound_name, broadcast, lock_joined_room},
};

pub struct DeleteMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    message_store: Arc<MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DeleteMessageUseCase {
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

    /// 作者本人または管理者のみ削除できる。削除したメッセージを返す
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        message_id: MessageId,
    ) -> Result<ChatMessage, SessionError> {
        let mut room = lock_joined_room(self.repository.as_ref(), connection_id, room_name).await?;
        let requester = bound_name(&room, connection_id)?;
        let is_admin = policy::can_moderate(&room, connection_id);

        let removed = self
            .message_store
            .delete(&mut room, &message_id, &requester, is_admin)
            .await?;
        tracing::debug!("'{}' deleted '{}' in room '{}'", requester, message_id, room_name);

        broadcast(
            self.message_pusher.as_ref(),
            &room.connection_ids(),
            ServerEvent::MessageDeleted { message_id },
        )
        .await;
        Ok(removed)
    }
}
