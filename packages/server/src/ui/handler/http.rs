//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use hiroba_shared::time::millis_to_rfc3339;

use crate::{
    infrastructure::dto::{
        http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
        websocket::MessageDto,
    },
    ui::state::AppState,
    usecase::{GetRoomError, RoomView},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(to_summary).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(&room).await {
        Ok(view) => Ok(Json(to_detail(&view))),
        Err(GetRoomError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}

/// Get the stored messages of a room, oldest first
pub async fn get_room_history(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<Vec<MessageDto>>, StatusCode> {
    match state.get_room_history_usecase.execute(&room).await {
        Ok(messages) => Ok(Json(messages.iter().map(MessageDto::from).collect())),
        Err(GetRoomError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}

fn to_summary(view: &RoomView) -> RoomSummaryDto {
    RoomSummaryDto {
        name: view.name.as_str().to_string(),
        members: view
            .members
            .iter()
            .map(|m| m.name.as_str().to_string())
            .collect(),
        admin: view.admin.as_ref().map(|a| a.as_str().to_string()),
        message_count: view.message_count,
    }
}

fn to_detail(view: &RoomView) -> RoomDetailDto {
    RoomDetailDto {
        name: view.name.as_str().to_string(),
        members: view
            .members
            .iter()
            .map(|m| MemberDetailDto {
                username: m.name.as_str().to_string(),
                joined_at: millis_to_rfc3339(m.joined_at.value()),
            })
            .collect(),
        admin: view.admin.as_ref().map(|a| a.as_str().to_string()),
        message_count: view.message_count,
        created_at: millis_to_rfc3339(view.created_at.value()),
    }
}
