//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /api/rooms` item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub name: String,
    pub members: Vec<String>,
    pub admin: Option<String>,
    pub message_count: usize,
}

/// `GET /api/rooms/{room}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub name: String,
    pub members: Vec<MemberDetailDto>,
    pub admin: Option<String>,
    pub message_count: usize,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailDto {
    pub username: String,
    /// RFC 3339
    pub joined_at: String,
}
