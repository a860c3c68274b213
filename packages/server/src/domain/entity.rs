//! Entities
//!
//! - `ChatMessage`: ルームの履歴に保持されるメッセージ
//! - `Reactions`: 絵文字ごとのリアクションしたユーザー
//! - `Member`: ルームに参加中の接続
//! - `MembershipSnapshot`: 参加者一覧 + 管理者

use super::value_object::{
    ConnectionId, DisplayName, Email, Emoji, MessageId, MessageText, Timestamp,
};

/// Emoji → display names that reacted with it (in reaction order).
///
/// Emojis keep the order in which they were first used. Buckets are never
/// empty and names are unique within a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reactions(Vec<(Emoji, Vec<DisplayName>)>);

impl Reactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored data, dropping duplicate names and empty buckets.
    ///
    /// A repeated emoji is merged into its first occurrence.
    pub fn from_entries(entries: impl IntoIterator<Item = (Emoji, Vec<DisplayName>)>) -> Self {
        let mut reactions = Self::new();
        for (emoji, names) in entries {
            let index = match reactions.position(&emoji) {
                Some(index) => index,
                None => {
                    reactions.0.push((emoji, Vec::with_capacity(names.len())));
                    reactions.0.len() - 1
                }
            };
            let bucket = &mut reactions.0[index].1;
            for name in names {
                if !bucket.contains(&name) {
                    bucket.push(name);
                }
            }
        }
        reactions.0.retain(|(_, names)| !names.is_empty());
        reactions
    }

    /// Add `name` under `emoji`, or remove it if already present.
    ///
    /// Returns `true` if the reaction was added.
    pub fn toggle(&mut self, emoji: Emoji, name: &DisplayName) -> bool {
        let Some(index) = self.position(&emoji) else {
            self.0.push((emoji, vec![name.clone()]));
            return true;
        };
        let bucket = &mut self.0[index].1;
        if let Some(pos) = bucket.iter().position(|n| n == name) {
            bucket.remove(pos);
            if bucket.is_empty() {
                self.0.remove(index);
            }
            false
        } else {
            bucket.push(name.clone());
            true
        }
    }

    pub fn get(&self, emoji: &Emoji) -> Option<&[DisplayName]> {
        self.position(emoji).map(|index| self.0[index].1.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Emoji, &Vec<DisplayName>)> {
        self.0.iter().map(|(emoji, names)| (emoji, names))
    }

    fn position(&self, emoji: &Emoji) -> Option<usize> {
        self.0.iter().position(|(e, _)| e == emoji)
    }
}

/// A chat message owned by a room's message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    /// Author display name at send time
    pub author: DisplayName,
    /// Author email snapshot at send time
    pub email: Option<Email>,
    pub text: MessageText,
    pub reactions: Reactions,
    pub edited: bool,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(
        id: MessageId,
        author: DisplayName,
        email: Option<Email>,
        text: MessageText,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            author,
            email,
            text,
            reactions: Reactions::new(),
            edited: false,
            created_at,
        }
    }
}

/// 参加者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub name: DisplayName,
    pub email: Option<Email>,
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(
        connection_id: ConnectionId,
        name: DisplayName,
        email: Option<Email>,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            name,
            email,
            joined_at,
        }
    }
}

/// Current member names (join order) plus the resolved admin name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipSnapshot {
    pub members: Vec<DisplayName>,
    pub admin: Option<DisplayName>,
}
