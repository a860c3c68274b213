//! Helpers shared by the per-event use cases.
//!
//! Mutating use cases lock the room with [`lock_joined_room`], mutate, persist
//! and fan out while the guard is alive, so a room's outbound events leave in
//! the order its inbound events were accepted.

use tokio::sync::OwnedMutexGuard;

use crate::domain::{
    ConnectionId, DisplayName, MessagePusher, Room, RoomName, RoomRepository, ServerEvent,
};

use super::error::SessionError;

/// Lock `room` and check that `connection_id` is still a member of it.
pub(crate) async fn lock_joined_room(
    repository: &dyn RoomRepository,
    connection_id: &ConnectionId,
    room: &RoomName,
) -> Result<OwnedMutexGuard<Room>, SessionError> {
    let handle = repository
        .find_room(room)
        .await
        .ok_or(SessionError::NotJoined)?;
    let guard = handle.lock_owned().await;
    if !guard.is_member(connection_id) {
        return Err(SessionError::NotJoined);
    }
    Ok(guard)
}

/// Display name currently bound to `connection_id` in `room`.
pub(crate) fn bound_name(
    room: &Room,
    connection_id: &ConnectionId,
) -> Result<DisplayName, SessionError> {
    room.member(connection_id)
        .map(|m| m.name.clone())
        .ok_or(SessionError::NotJoined)
}

pub(crate) async fn push(pusher: &dyn MessagePusher, target: &ConnectionId, event: ServerEvent) {
    if let Err(e) = pusher.push_to(target, &event).await {
        tracing::warn!("Failed to push '{}' to '{}': {}", event.kind(), target, e);
    }
}

pub(crate) async fn broadcast(
    pusher: &dyn MessagePusher,
    targets: &[ConnectionId],
    event: ServerEvent,
) {
    if targets.is_empty() {
        return;
    }
    if let Err(e) = pusher.broadcast(targets, &event).await {
        tracing::warn!("Failed to broadcast '{}': {}", event.kind(), e);
    }
}
