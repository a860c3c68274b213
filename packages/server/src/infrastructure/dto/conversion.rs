//! Conversion logic between DTOs and domain entities.

use hiroba_shared::time::{millis_to_rfc3339, rfc3339_to_millis};

use crate::domain::{
    ChatMessage, ClientCommand, DisplayName, Email, Emoji, MessageId, MessageText, Reactions,
    RoomName, ServerEvent, Timestamp, ValueObjectError,
};
use crate::infrastructure::dto::{
    archive::MessageRecord,
    websocket::{ClientEvent, MessageDto, ReactionsDto, ServerMessage},
};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<ClientEvent> for ClientCommand {
    type Error = ValueObjectError;

    fn try_from(event: ClientEvent) -> Result<Self, Self::Error> {
        Ok(match event {
            ClientEvent::Join {
                username,
                room,
                email,
            } => ClientCommand::Join {
                username: DisplayName::or_default(&username)?,
                room: RoomName::or_default(&room)?,
                email: Email::optional(email.as_deref())?,
            },
            ClientEvent::Send { text } => ClientCommand::Send {
                text: MessageText::new(text)?,
            },
            ClientEvent::React { message_id, emoji } => ClientCommand::React {
                message_id: MessageId::new(message_id)?,
                emoji: Emoji::new(emoji)?,
            },
            ClientEvent::Edit { message_id, text } => ClientCommand::Edit {
                message_id: MessageId::new(message_id)?,
                text: MessageText::new(text)?,
            },
            ClientEvent::Delete { message_id } => ClientCommand::Delete {
                message_id: MessageId::new(message_id)?,
            },
            ClientEvent::Kick { target } => ClientCommand::Kick {
                target: DisplayName::new(target.trim().to_string())?,
            },
            ClientEvent::Typing => ClientCommand::Typing,
            ClientEvent::StopTyping => ClientCommand::StopTyping,
        })
    }
}

/// Archived records are restored as written; only inbound events are validated.
impl From<MessageRecord> for ChatMessage {
    fn from(record: MessageRecord) -> Self {
        let reactions = record.reactions.into_iter().map(|(emoji, names)| {
            (
                Emoji::from_stored(emoji),
                names.into_iter().map(DisplayName::from_stored).collect(),
            )
        });

        Self {
            id: MessageId::from_stored(record.id),
            author: DisplayName::from_stored(record.username),
            email: Email::from_stored(record.email),
            text: MessageText::from_stored(record.text),
            reactions: Reactions::from_entries(reactions),
            edited: record.edited,
            // Unparseable times fall back to the epoch rather than dropping the message
            created_at: Timestamp::new(rfc3339_to_millis(&record.time).unwrap_or_default()),
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

fn reactions_to_dto(reactions: &Reactions) -> ReactionsDto {
    reactions
        .iter()
        .map(|(emoji, names)| {
            (
                emoji.as_str().to_string(),
                names.iter().map(|n| n.as_str().to_string()).collect(),
            )
        })
        .collect()
}

fn names_to_dto(names: &[DisplayName]) -> Vec<String> {
    names.iter().map(|n| n.as_str().to_string()).collect()
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            username: message.author.as_str().to_string(),
            text: message.text.as_str().to_string(),
            email: message
                .email
                .as_ref()
                .map(|e| e.as_str().to_string())
                .unwrap_or_default(),
            reactions: reactions_to_dto(&message.reactions),
            time: millis_to_rfc3339(message.created_at.value()),
            edited: message.edited,
        }
    }
}

impl From<&ChatMessage> for MessageRecord {
    fn from(message: &ChatMessage) -> Self {
        let dto = MessageDto::from(message);
        Self {
            id: dto.id,
            username: dto.username,
            text: dto.text,
            email: dto.email,
            reactions: dto.reactions,
            time: dto.time,
            edited: dto.edited,
        }
    }
}

impl From<&ServerEvent> for ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::History { messages } => ServerMessage::History {
                messages: messages.iter().map(MessageDto::from).collect(),
            },
            ServerEvent::NewMessage(message) => ServerMessage::NewMessage(message.into()),
            ServerEvent::ReactionUpdate {
                message_id,
                reactions,
            } => ServerMessage::ReactionUpdate {
                message_id: message_id.as_str().to_string(),
                reactions: reactions_to_dto(reactions),
            },
            ServerEvent::MessageEdited { message_id, text } => ServerMessage::MessageEdited {
                message_id: message_id.as_str().to_string(),
                text: text.as_str().to_string(),
            },
            ServerEvent::MessageDeleted { message_id } => ServerMessage::MessageDeleted {
                message_id: message_id.as_str().to_string(),
            },
            ServerEvent::SystemNotice {
                text,
                room,
                members,
            } => ServerMessage::SystemNotice {
                text: text.clone(),
                room: room.as_str().to_string(),
                members: names_to_dto(members),
            },
            ServerEvent::MembershipUpdate(snapshot) => ServerMessage::MembershipUpdate {
                members: names_to_dto(&snapshot.members),
                admin: snapshot.admin.as_ref().map(|a| a.as_str().to_string()),
            },
            ServerEvent::TypingState {
                username,
                is_typing,
            } => ServerMessage::TypingState {
                username: username.as_str().to_string(),
                is_typing: *is_typing,
            },
            ServerEvent::Kicked { room, reason } => ServerMessage::Kicked {
                room: room.as_str().to_string(),
                reason: reason.clone(),
            },
            ServerEvent::Error { code, message } => ServerMessage::Error {
                code: code.as_str().to_string(),
                message: message.clone(),
            },
        }
    }
}
