//! UseCase layer
//!
//! Business logic for the chat server. Each use case holds the domain traits it
//! needs behind `Arc<dyn ...>` and works on domain types only.

pub mod delete_message;
pub mod edit_message;
pub mod error;
pub mod get_room_detail;
pub mod get_room_history;
pub mod get_rooms;
pub mod join_room;
pub mod kick_member;
pub mod leave_room;
pub mod message_store;
pub mod react_to_message;
mod room_access;
pub mod send_message;
pub mod session;
pub mod typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use delete_message::DeleteMessageUseCase;
pub use edit_message::EditMessageUseCase;
pub use error::{GetRoomError, SessionError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_room_history::GetRoomHistoryUseCase;
pub use get_rooms::{GetRoomsUseCase, RoomView};
pub use join_room::JoinRoomUseCase;
pub use kick_member::KickMemberUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use message_store::MessageStore;
pub use react_to_message::ToggleReactionUseCase;
pub use send_message::SendMessageUseCase;
pub use session::{Binding, Session, SessionCoordinator, SessionState};
pub use typing::TypingUseCase;
