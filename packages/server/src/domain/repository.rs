//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ChatMessage, PersistenceError, Room, RoomName};

/// ルームごとの排他アクセス単位
///
/// 1つのルームに対する変更・永続化・通知は、このロックを保持したまま行う。
/// これにより、ルーム内の通知順序は受理順序と一致する。
pub type RoomHandle = Arc<Mutex<Room>>;

/// Room Repository trait
///
/// ルーム名 → ルームの対応を管理する。ルームは最初の join で作成され、明示的には削除されない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを取得（存在しなければアーカイブから履歴を読み込んで作成）
    async fn get_or_create_room(&self, name: &RoomName) -> RoomHandle;

    /// 既存のルームを取得
    async fn find_room(&self, name: &RoomName) -> Option<RoomHandle>;

    /// 全てのルームを名前順で取得
    async fn list_rooms(&self) -> Vec<RoomHandle>;
}

/// 永続化の協調者
///
/// ルームごとのメッセージ履歴を読み込み・保存する。保存形式は実装側が決める。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageArchive: Send + Sync {
    /// ルームの保存済みメッセージを古い順で取得（未保存なら空）
    async fn load(&self, room: &RoomName) -> Result<Vec<ChatMessage>, PersistenceError>;

    /// ルームのメッセージ履歴全体を保存
    async fn save(&self, room: &RoomName, messages: &[ChatMessage])
    -> Result<(), PersistenceError>;
}
