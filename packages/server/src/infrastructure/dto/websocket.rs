//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `"type"`, with camelCase field names.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};

/// Reactions as sent over the wire: emoji → display names.
///
/// Serialized as a JSON object whose keys keep the order in which each emoji
/// was first used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionsDto(Vec<(String, Vec<String>)>);

impl ReactionsDto {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, emoji: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(e, _)| e == emoji)
            .map(|(_, names)| names.as_slice())
    }
}

impl FromIterator<(String, Vec<String>)> for ReactionsDto {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ReactionsDto {
    type Item = (String, Vec<String>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for ReactionsDto {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(emoji, names)| (emoji, names)))
    }
}

impl<'de> Deserialize<'de> for ReactionsDto {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReactionsVisitor;

        impl<'de> Visitor<'de> for ReactionsVisitor {
            type Value = ReactionsDto;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of emoji to display names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(ReactionsDto(entries))
            }
        }

        deserializer.deserialize_map(ReactionsVisitor)
    }
}

/// Inbound event (client → server)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    Join {
        username: String,
        room: String,
        #[serde(default)]
        email: Option<String>,
    },
    Send {
        text: String,
    },
    React {
        message_id: String,
        emoji: String,
    },
    Edit {
        message_id: String,
        text: String,
    },
    Delete {
        message_id: String,
    },
    Kick {
        #[serde(alias = "targetDisplayName")]
        target: String,
    },
    Typing,
    StopTyping,
}

/// A message as sent over the wire (also returned by the HTTP history endpoint)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub username: String,
    pub text: String,
    /// Empty when the author gave no email
    pub email: String,
    pub reactions: ReactionsDto,
    /// RFC 3339 UTC
    pub time: String,
    pub edited: bool,
}

/// Outbound event (server → client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    History {
        messages: Vec<MessageDto>,
    },
    NewMessage(MessageDto),
    ReactionUpdate {
        message_id: String,
        reactions: ReactionsDto,
    },
    MessageEdited {
        message_id: String,
        text: String,
    },
    MessageDeleted {
        message_id: String,
    },
    SystemNotice {
        text: String,
        room: String,
        members: Vec<String>,
    },
    MembershipUpdate {
        members: Vec<String>,
        admin: Option<String>,
    },
    TypingState {
        username: String,
        is_typing: bool,
    },
    Kicked {
        room: String,
        reason: String,
    },
    Error {
        code: String,
        message: String,
    },
}
