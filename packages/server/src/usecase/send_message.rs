//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ ID の採番、作者情報の付与、履歴への追加、ブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者を含むルーム全員に newMessage が届くことを保証
//! - 作者名とメールアドレスが join 時の値から取られることを保証
//! - 保存件数の上限を超えると古いメッセージから捨てられることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：join していない接続からの送信
//! - エッジケース：履歴の上限に達している場合

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, MessageIdFactory, MessagePusher, MessageText, RoomName,
    RoomRepository, ServerEvent, Timestamp,
};

use super::{
    error::SessionError,
    message_store::MessageStore,
    room_access::{broadcast, lock_joined_room},
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    message_store: Arc<MessageStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
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

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続 ID
    /// * `room_name` - 送信者が join しているルーム
    /// * `text` - 検証済みの本文
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 保存されたメッセージ
    /// * `Err(SessionError::NotJoined)` - ルームに参加していない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        text: MessageText,
    ) -> Result<ChatMessage, SessionError> {
        let mut room = lock_joined_room(self.repository.as_ref(), connection_id, room_name).await?;
        let author = room.member(connection_id).ok_or(SessionError::NotJoined)?.clone();

        // 1. 採番して履歴に追加（永続化まで行う）
        let created_at = Timestamp::new(self.clock.now_millis());
        let message = ChatMessage::new(
            MessageIdFactory::generate(created_at),
            author.name,
            author.email,
            text,
            created_at,
        );
        let stored = self.message_store.append(&mut room, message).await;
        tracing::debug!("'{}' posted '{}' in room '{}'", stored.author, stored.id, room_name);

        // 2. 送信者を含むルーム全員にブロードキャスト
        broadcast(
            self.message_pusher.as_ref(),
            &room.connection_ids(),
            ServerEvent::NewMessage(stored.clone()),
        )
        .await;

        Ok(stored)
    }
}
