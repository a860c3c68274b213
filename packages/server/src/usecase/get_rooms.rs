//! UseCase: ルーム一覧取得処理

use std::sync::Arc;

use crate::domain::{DisplayName, Member, Room, RoomName, RoomRepository, Timestamp};

/// HTTP API 向けのルームの読み取りモデル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    pub name: RoomName,
    /// 参加順
    pub members: Vec<Member>,
    pub admin: Option<DisplayName>,
    pub message_count: usize,
    pub created_at: Timestamp,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            members: room.members().to_vec(),
            admin: room.admin_name().cloned(),
            message_count: room.messages().len(),
            created_at: room.created_at,
        }
    }
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム名の昇順で返す
    pub async fn execute(&self) -> Vec<RoomView> {
        let mut views = Vec::new();
        for handle in self.repository.list_rooms().await {
            let room = handle.lock().await;
            views.push(RoomView::from(&*room));
        }
        views
    }
}
