//! Domain layer for the chat server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_log;
pub mod message_pusher;
pub mod policy;
pub mod repository;
pub mod room;
pub mod value_object;

pub use entity::{ChatMessage, Member, MembershipSnapshot, Reactions};
pub use error::{MessagePushError, MessageStoreError, PersistenceError, ValueObjectError};
pub use event::{ClientCommand, ErrorCode, ServerEvent};
pub use message_log::{DEFAULT_HISTORY_LIMIT, MessageLog};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{MessageArchive, RoomHandle, RoomRepository};
pub use room::Room;
pub use value_object::{
    ConnectionId, DisplayName, Email, Emoji, MessageId, MessageIdFactory, MessageText, RoomName,
    Timestamp,
};
