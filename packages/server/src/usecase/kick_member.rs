//! UseCase: 参加者のキック
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - KickMemberUseCase::execute() メソッド
//! - 管理者の権限チェック、対象接続の強制退出、kicked 通知、接続の登録解除
//!
//! ### なぜこのテストが必要か
//! - 管理者以外は誰も追い出せないことを保証
//! - キックされた接続にだけ kicked が届き、その後はルームのイベントが届かないことを保証
//! - 同じ表示名の接続が複数ある場合は全員が対象になることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：管理者が参加者をキック
//! - 異常系：管理者以外によるキック、存在しない名前の指定
//! - エッジケース：管理者が自分自身をキック（管理者が継承される）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DisplayName, MessagePusher, RoomName, RoomRepository, ServerEvent, policy,
};

use super::{
    error::SessionError,
    room_access::{bound_name, broadcast, lock_joined_room, push},
};

/// キックのユースケース
pub struct KickMemberUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl KickMemberUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// キックを実行
    ///
    /// 1. 要求者が管理者であることを確認
    /// 2. `target` と同じ表示名の接続をすべて退出させ、それぞれに kicked を送って登録を解除
    /// 3. 残った参加者に通知と参加者一覧（必要なら新しい管理者）を送信
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - キックされた接続
    /// * `Err(SessionError::NotAdmin)` - 要求者が管理者ではない
    /// * `Err(SessionError::MemberNotFound)` - 該当する参加者がいない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        target: DisplayName,
    ) -> Result<Vec<ConnectionId>, SessionError> {
        let mut room = lock_joined_room(self.repository.as_ref(), connection_id, room_name).await?;
        if !policy::can_moderate(&room, connection_id) {
            return Err(SessionError::NotAdmin("kick"));
        }
        let admin = bound_name(&room, connection_id)?;

        let kicked = room.connections_named(&target);
        if kicked.is_empty() {
            return Err(SessionError::MemberNotFound(target));
        }

        for kicked_id in &kicked {
            room.leave(kicked_id);
            push(
                self.message_pusher.as_ref(),
                kicked_id,
                ServerEvent::kicked(room_name, &admin),
            )
            .await;
            // Dropping the sender lets the socket flush the notice and close.
            self.message_pusher.unregister_client(kicked_id).await;
        }
        tracing::info!(
            "'{}' kicked '{}' ({} connection(s)) from room '{}'",
            admin,
            target,
            kicked.len(),
            room_name
        );

        let snapshot = room.snapshot();
        let targets = room.connection_ids();
        broadcast(
            self.message_pusher.as_ref(),
            &targets,
            ServerEvent::kicked_notice(&target, &admin, room_name, snapshot.members.clone()),
        )
        .await;
        broadcast(
            self.message_pusher.as_ref(),
            &targets,
            ServerEvent::MembershipUpdate(snapshot),
        )
        .await;

        Ok(kicked)
    }
}
