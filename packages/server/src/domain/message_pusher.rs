//! MessagePusher trait 定義
//!
//! 接続へのイベント送信（Broadcast Fanout）の抽象化。
//! 実際の送信手段（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// Outbound channel of one connection (already-encoded frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除（送信チャンネルを閉じ、トランスポートの切断を促す）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 接続が登録されているか
    async fn is_registered(&self, connection_id: &ConnectionId) -> bool;

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信（一部の送信失敗は許容）
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
