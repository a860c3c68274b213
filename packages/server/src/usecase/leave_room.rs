//! UseCase: ルーム退出処理
//!
//! 切断、別ルームへの join（暗黙の退出）のどちらでも使われる。
//! 管理者が抜けた場合は Room が管理者の継承を行う。

use std::sync::Arc;

use crate::domain::{ConnectionId, Member, MessagePusher, RoomName, RoomRepository, ServerEvent};

use super::room_access::broadcast;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム退出を実行
    ///
    /// # Returns
    ///
    /// * `Some(Member)` - 退出した参加者
    /// * `None` - すでに参加していなかった（kick 済みなど）。通知は行わない
    pub async fn execute(&self, connection_id: &ConnectionId, room_name: &RoomName) -> Option<Member> {
        let handle = self.repository.find_room(room_name).await?;
        let mut room = handle.lock().await;

        let member = room.leave(connection_id)?;
        let snapshot = room.snapshot();
        tracing::info!(
            "'{}' ({}) left room '{}' ({} remaining)",
            member.name,
            connection_id,
            room_name,
            snapshot.members.len()
        );

        let targets = room.connection_ids();
        broadcast(
            self.message_pusher.as_ref(),
            &targets,
            ServerEvent::left_notice(&member.name, room_name, snapshot.members.clone()),
        )
        .await;
        broadcast(
            self.message_pusher.as_ref(),
            &targets,
            ServerEvent::MembershipUpdate(snapshot),
        )
        .await;

        Some(member)
    }
}
