//! Inbound commands and outbound events.
//!
//! Both directions are closed sets. Wire formats live in
//! `infrastructure::dto::websocket`; these are the validated domain forms.

use super::{
    entity::{ChatMessage, MembershipSnapshot, Reactions},
    value_object::{DisplayName, Email, Emoji, MessageId, MessageText, RoomName},
};

/// A validated request from a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Join {
        username: DisplayName,
        room: RoomName,
        email: Option<Email>,
    },
    Send {
        text: MessageText,
    },
    React {
        message_id: MessageId,
        emoji: Emoji,
    },
    Edit {
        message_id: MessageId,
        text: MessageText,
    },
    Delete {
        message_id: MessageId,
    },
    Kick {
        target: DisplayName,
    },
    Typing,
    StopTyping,
}

impl ClientCommand {
    /// Wire name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Send { .. } => "send",
            Self::React { .. } => "react",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
            Self::Kick { .. } => "kick",
            Self::Typing => "typing",
            Self::StopTyping => "stopTyping",
        }
    }
}

/// Reason a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MalformedEvent,
    NotJoined,
    NotFound,
    Forbidden,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedEvent => "malformedEvent",
            Self::NotJoined => "notJoined",
            Self::NotFound => "notFound",
            Self::Forbidden => "forbidden",
        }
    }
}

/// An event delivered to one connection or fanned out to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Sent once, to the joining connection only
    History { messages: Vec<ChatMessage> },
    NewMessage(ChatMessage),
    ReactionUpdate {
        message_id: MessageId,
        reactions: Reactions,
    },
    MessageEdited {
        message_id: MessageId,
        text: MessageText,
    },
    MessageDeleted { message_id: MessageId },
    SystemNotice {
        text: String,
        room: RoomName,
        members: Vec<DisplayName>,
    },
    MembershipUpdate(MembershipSnapshot),
    TypingState {
        username: DisplayName,
        is_typing: bool,
    },
    Kicked { room: RoomName, reason: String },
    Error { code: ErrorCode, message: String },
}

impl ServerEvent {
    pub fn joined_notice(name: &DisplayName, room: &RoomName, members: Vec<DisplayName>) -> Self {
        Self::SystemNotice {
            text: format!("{name} joined {room}"),
            room: room.clone(),
            members,
        }
    }

    pub fn left_notice(name: &DisplayName, room: &RoomName, members: Vec<DisplayName>) -> Self {
        Self::SystemNotice {
            text: format!("{name} left {room}"),
            room: room.clone(),
            members,
        }
    }

    pub fn kicked_notice(
        target: &DisplayName,
        admin: &DisplayName,
        room: &RoomName,
        members: Vec<DisplayName>,
    ) -> Self {
        Self::SystemNotice {
            text: format!("{target} was kicked by {admin}"),
            room: room.clone(),
            members,
        }
    }

    pub fn kicked(room: &RoomName, admin: &DisplayName) -> Self {
        Self::Kicked {
            room: room.clone(),
            reason: format!("Kicked by {admin}"),
        }
    }

    /// Wire name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::History { .. } => "history",
            Self::NewMessage(_) => "newMessage",
            Self::ReactionUpdate { .. } => "reactionUpdate",
            Self::MessageEdited { .. } => "messageEdited",
            Self::MessageDeleted { .. } => "messageDeleted",
            Self::SystemNotice { .. } => "systemNotice",
            Self::MembershipUpdate(_) => "membershipUpdate",
            Self::TypingState { .. } => "typingState",
            Self::Kicked { .. } => "kicked",
            Self::Error { .. } => "error",
        }
    }
}
