//! Value Objects
//!
//! 入力境界で検証済みであることを型で保証する。生成後は不変。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

const MAX_ROOM_NAME_CHARS: usize = 64;
const MAX_DISPLAY_NAME_CHARS: usize = 64;
const MAX_EMAIL_CHARS: usize = 254;
const MAX_MESSAGE_TEXT_CHARS: usize = 4000;
const MAX_EMOJI_CHARS: usize = 32;
const MAX_MESSAGE_ID_CHARS: usize = 128;

pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";
pub const DEFAULT_ROOM_NAME: &str = "general";

fn validate_text(
    field: &'static str,
    value: &str,
    max: usize,
    allow_newlines: bool,
) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(ValueObjectError::TooLong { field, max, actual });
    }
    let has_control = value
        .chars()
        .any(|c| c.is_control() && !(allow_newlines && (c == '\n' || c == '\t')));
    if has_control {
        return Err(ValueObjectError::ControlCharacters { field });
    }
    Ok(())
}

macro_rules! string_value_object {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value.to_string())
            }
        }
    };
}

/// Transport-assigned identity of a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ValueObjectError::InvalidConnectionId(value.to_string()))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name. Case-sensitive, arbitrary text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("room", &value, MAX_ROOM_NAME_CHARS, false)?;
        Ok(Self(value))
    }

    /// Blank input falls back to the `general` room.
    pub fn or_default(value: &str) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(Self(DEFAULT_ROOM_NAME.to_string()))
        } else {
            Self::new(trimmed.to_string())
        }
    }
}

string_value_object!(RoomName);

/// Display name. Unauthenticated free text; message authorship is resolved against it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("username", &value, MAX_DISPLAY_NAME_CHARS, false)?;
        Ok(Self(value))
    }

    /// Restore a value read back from the archive. Inbound validation is
    /// skipped so every persisted record survives a reload.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Blank input falls back to `Anonymous`.
    pub fn or_default(value: &str) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(Self(DEFAULT_DISPLAY_NAME.to_string()))
        } else {
            Self::new(trimmed.to_string())
        }
    }
}

string_value_object!(DisplayName);

/// Contact email. Not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("email", &value, MAX_EMAIL_CHARS, false)?;
        Ok(Self(value))
    }

    /// An empty stored email means none was given.
    pub fn from_stored(value: String) -> Option<Self> {
        (!value.is_empty()).then_some(Self(value))
    }

    /// Blank or missing input means "no email".
    pub fn optional(value: Option<&str>) -> Result<Option<Self>, ValueObjectError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => Self::new(v.to_string()).map(Some),
        }
    }
}

string_value_object!(Email);

/// Message identifier (`<millis>-<random suffix>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("messageId", &value, MAX_MESSAGE_ID_CHARS, false)?;
        Ok(Self(value))
    }

    pub fn from_stored(value: String) -> Self {
        Self(value)
    }
}

string_value_object!(MessageId);

/// MessageId の生成器
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// 時刻ベース + ランダムサフィックスの ID を生成する
    pub fn generate(timestamp: Timestamp) -> MessageId {
        let suffix = Uuid::new_v4().simple().to_string();
        MessageId(format!("{}-{}", timestamp.value(), &suffix[..6]))
    }
}

/// Message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("text"));
        }
        validate_text("text", &value, MAX_MESSAGE_TEXT_CHARS, true)?;
        Ok(Self(value))
    }

    /// Restore archived text as written, including blank text.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }
}

string_value_object!(MessageText);

/// Reaction key. Usually a single emoji, but any short label is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Emoji(String);

impl Emoji {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("emoji", &value, MAX_EMOJI_CHARS, false)?;
        Ok(Self(value))
    }

    pub fn from_stored(value: String) -> Self {
        Self(value)
    }
}

string_value_object!(Emoji);

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_blank_falls_back_to_anonymous() {
        // テスト項目: 空白のみのユーザー名は Anonymous になる
        // given (前提条件):
        let input = "   ";

        // when (操作):
        let name = DisplayName::or_default(input).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn test_display_name_is_trimmed() {
        // テスト項目: 前後の空白は取り除かれる
        let name = DisplayName::or_default("  alice ").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn test_room_name_is_case_sensitive() {
        // テスト項目: ルーム名は大文字小文字を区別する
        // given (前提条件):
        let lower = RoomName::or_default("general").unwrap();
        let upper = RoomName::or_default("General").unwrap();

        // then (期待する結果):
        assert_ne!(lower, upper);
        assert_eq!(RoomName::or_default("").unwrap().as_str(), DEFAULT_ROOM_NAME);
    }

    #[test]
    fn test_display_name_too_long() {
        // テスト項目: 長すぎるユーザー名はエラーになる
        // given (前提条件):
        let input = "a".repeat(MAX_DISPLAY_NAME_CHARS + 1);

        // when (操作):
        let result = DisplayName::new(input);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::TooLong {
                field: "username",
                max: MAX_DISPLAY_NAME_CHARS,
                actual: MAX_DISPLAY_NAME_CHARS + 1,
            })
        );
    }

    #[test]
    fn test_display_name_rejects_control_characters() {
        // テスト項目: 制御文字を含むユーザー名は拒否される
        let result = DisplayName::new("ali\nce".to_string());
        assert_eq!(
            result,
            Err(ValueObjectError::ControlCharacters { field: "username" })
        );
    }

    #[test]
    fn test_message_text_allows_newlines_but_not_blank() {
        // テスト項目: 本文は改行を許可するが空白のみは拒否する
        assert!(MessageText::new("line 1\nline 2".to_string()).is_ok());
        assert_eq!(
            MessageText::new(" \n ".to_string()),
            Err(ValueObjectError::Empty("text"))
        );
    }

    #[test]
    fn test_email_optional() {
        // テスト項目: メールアドレスは空なら None になる
        assert_eq!(Email::optional(None).unwrap(), None);
        assert_eq!(Email::optional(Some("  ")).unwrap(), None);
        assert_eq!(
            Email::optional(Some("alice@example.com")).unwrap(),
            Some(Email::new("alice@example.com".to_string()).unwrap())
        );
    }

    #[test]
    fn test_message_id_factory_is_time_based_and_unique() {
        // テスト項目: 同じ時刻でも異なる ID が生成され、時刻がプレフィックスになる
        // given (前提条件):
        let timestamp = Timestamp::new(1_700_000_000_000);

        // when (操作):
        let first = MessageIdFactory::generate(timestamp);
        let second = MessageIdFactory::generate(timestamp);

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("1700000000000-"));
        assert_eq!(first.as_str().len(), "1700000000000-".len() + 6);
    }

    #[test]
    fn test_connection_id_parse_roundtrip() {
        // テスト項目: 文字列表現から ConnectionId を復元できる
        let id = ConnectionId::generate();
        assert_eq!(ConnectionId::parse(&id.to_string()).unwrap(), id);
        assert!(ConnectionId::parse("not-a-uuid").is_err());
    }
}
