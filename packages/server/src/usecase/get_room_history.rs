//! UseCase: ルームのメッセージ履歴取得処理

use std::sync::Arc;

use crate::domain::{ChatMessage, RoomName, RoomRepository};

use super::error::GetRoomError;

pub struct GetRoomHistoryUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomHistoryUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 古い順のメッセージ一覧
    pub async fn execute(&self, room_name: &str) -> Result<Vec<ChatMessage>, GetRoomError> {
        let not_found = || GetRoomError::RoomNotFound(room_name.to_string());
        let name = RoomName::new(room_name.to_string()).map_err(|_| not_found())?;
        let handle = self.repository.find_room(&name).await.ok_or_else(not_found)?;
        let room = handle.lock().await;
        Ok(room.messages().history())
    }
}
