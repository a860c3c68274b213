//! UseCase: ルーム詳細取得処理

use std::sync::Arc;

use crate::domain::{RoomName, RoomRepository};

use super::{error::GetRoomError, get_rooms::RoomView};

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 存在しないルームを作成することはない
    pub async fn execute(&self, room_name: &str) -> Result<RoomView, GetRoomError> {
        let name = RoomName::new(room_name.to_string())
            .map_err(|_| GetRoomError::RoomNotFound(room_name.to_string()))?;
        let handle = self
            .repository
            .find_room(&name)
            .await
            .ok_or_else(|| GetRoomError::RoomNotFound(room_name.to_string()))?;
        let room = handle.lock().await;
        Ok(RoomView::from(&*room))
    }
}
