//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルーム名 → `Arc<Mutex<Room>>` の HashMap をインメモリ DB として使用します。
//!
//! ルームは最初のアクセス時に作成され、そのときアーカイブから履歴を読み込みます。
//! マップのロックはルームの取得・作成の間だけ保持し、ルーム自体のロックとは独立しています。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use hiroba_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    MessageArchive, MessageLog, Room, RoomHandle, RoomName, RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomName, RoomHandle>>,
    archive: Arc<dyn MessageArchive>,
    clock: Arc<dyn Clock>,
    history_limit: usize,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    ///
    /// # Arguments
    ///
    /// * `archive` - 新しく作成するルームの履歴の読み込み元
    /// * `clock` - ルームの作成時刻に使う時計
    /// * `history_limit` - ルームごとに保持するメッセージ数の上限
    pub fn new(
        archive: Arc<dyn MessageArchive>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            archive,
            clock,
            history_limit,
        }
    }

    async fn load_history(&self, name: &RoomName) -> MessageLog {
        match self.archive.load(name).await {
            Ok(messages) => {
                if !messages.is_empty() {
                    tracing::info!(
                        "Restored {} archived message(s) for room '{}'",
                        messages.len(),
                        name
                    );
                }
                MessageLog::with_messages(self.history_limit, messages)
            }
            Err(e) => {
                tracing::error!("Failed to load history for room '{}': {}", name, e);
                MessageLog::new(self.history_limit)
            }
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_or_create_room(&self, name: &RoomName) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms.get(name) {
            return room.clone();
        }

        let history = self.load_history(name).await;
        let room = Room::with_history(
            name.clone(),
            Timestamp::new(self.clock.now_millis()),
            history,
        );
        let handle: RoomHandle = Arc::new(Mutex::new(room));
        rooms.insert(name.clone(), handle.clone());
        tracing::info!("Room '{}' created", name);
        handle
    }

    async fn find_room(&self, name: &RoomName) -> Option<RoomHandle> {
        let rooms = self.rooms.lock().await;
        rooms.get(name).cloned()
    }

    async fn list_rooms(&self) -> Vec<RoomHandle> {
        let rooms = self.rooms.lock().await;
        let mut names: Vec<&RoomName> = rooms.keys().collect();
        names.sort();
        names.into_iter().map(|name| rooms[name].clone()).collect()
    }
}
