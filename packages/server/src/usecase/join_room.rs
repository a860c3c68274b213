//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加者テーブルへの追加、管理者の決定、履歴の送信、参加通知
//!
//! ### なぜこのテストが必要か
//! - 参加したクライアントだけが履歴を受け取り、ルーム全体が参加通知を受け取ることを保証
//! - 最初の参加者が管理者になることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加、既存のルームへの参加
//! - エッジケース：アーカイブに履歴があるルームへの参加

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionId, DisplayName, Email, Member, MessagePusher, RoomName, RoomRepository,
    ServerEvent, Timestamp,
};

use super::{
    message_store::MessageStore,
    room_access::{broadcast, push},
    session::Binding,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    message_store: Arc<MessageStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_store: Arc<MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_store,
            message_pusher,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// 1. ルームを取得（無ければ作成）してロック
    /// 2. 参加者テーブルに追加（管理者がいなければこの接続が管理者になる）
    /// 3. 参加者本人に履歴を送信
    /// 4. ルーム全体に参加通知と参加者一覧を送信
    ///
    /// # Returns
    ///
    /// 接続とルームの結び付き（Session が保持する）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        username: DisplayName,
        room_name: RoomName,
        email: Option<Email>,
    ) -> Binding {
        let handle = self.repository.get_or_create_room(&room_name).await;
        let mut room = handle.lock().await;

        let joined_at = Timestamp::new(self.clock.now_millis());
        let member = Member::new(connection_id, username.clone(), email, joined_at);
        let snapshot = room.join(member);
        tracing::info!(
            "'{}' ({}) joined room '{}' (admin: {:?})",
            username,
            connection_id,
            room_name,
            snapshot.admin.as_ref().map(DisplayName::as_str)
        );

        let history = self.message_store.history(&room);
        push(
            self.message_pusher.as_ref(),
            &connection_id,
            ServerEvent::History { messages: history },
        )
        .await;

        let targets = room.connection_ids();
        broadcast(
            self.message_pusher.as_ref(),
            &targets,
            ServerEvent::joined_notice(&username, &room_name, snapshot.members.clone()),
        )
        .await;
        broadcast(
            self.message_pusher.as_ref(),
            &targets,
            ServerEvent::MembershipUpdate(snapshot),
        )
        .await;

        Binding::new(room_name, username)
    }
}
