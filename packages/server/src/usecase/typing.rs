//! UseCase: 入力中インジケーター
//!
//! 入力中の状態はサーバーで保持せず、送信者以外の参加者へ中継するだけ。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomName, RoomRepository, ServerEvent};

use super::{
    error::SessionError,
    room_access::{bound_name, broadcast, lock_joined_room},
};

pub struct TypingUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl TypingUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        is_typing: bool,
    ) -> Result<(), SessionError> {
        let room = lock_joined_room(self.repository.as_ref(), connection_id, room_name).await?;
        let username = bound_name(&room, connection_id)?;

        let targets: Vec<ConnectionId> = room
            .connection_ids()
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();
        broadcast(
            self.message_pusher.as_ref(),
            &targets,
            ServerEvent::TypingState { username, is_typing },
        )
        .await;
        Ok(())
    }
}
