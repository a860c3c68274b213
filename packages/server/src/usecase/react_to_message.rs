//! UseCase: リアクションの付け外し
//!
//! 同じ参加者が同じ絵文字を再度送るとリアクションは外れる（トグル）。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Emoji, MessageId, MessagePusher, Reactions, RoomName, RoomRepository,
    ServerEvent,
};

use super::{
    error::SessionError,
    message_store::MessageStore,
    room_access::{bound_name, broadcast, lock_joined_room},
};

pub struct ToggleReactionUseCase {
    repository: Arc<dyn RoomRepository>,
    message_store: Arc<MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ToggleReactionUseCase {
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

    /// リアクションをトグルし、更新後のリアクション一覧をルーム全員に送る
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        message_id: MessageId,
        emoji: Emoji,
    ) -> Result<Reactions, SessionError> {
        let mut room = lock_joined_room(self.repository.as_ref(), connection_id, room_name).await?;
        let requester = bound_name(&room, connection_id)?;

        let reactions = self
            .message_store
            .toggle_reaction(&mut room, &message_id, emoji, &requester)
            .await?;

        broadcast(
            self.message_pusher.as_ref(),
            &room.connection_ids(),
            ServerEvent::ReactionUpdate {
                message_id,
                reactions: reactions.clone(),
            },
        )
        .await;
        Ok(reactions)
    }
}
