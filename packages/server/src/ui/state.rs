//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::{
    GetRoomDetailUseCase, GetRoomHistoryUseCase, GetRoomsUseCase, SessionCoordinator,
};

/// Shared application state
pub struct AppState {
    /// SessionCoordinator（WebSocket 接続ごとのイベント処理）
    pub session_coordinator: Arc<SessionCoordinator>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetRoomHistoryUseCase（メッセージ履歴取得のユースケース）
    pub get_room_history_usecase: Arc<GetRoomHistoryUseCase>,
}
