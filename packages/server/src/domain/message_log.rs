//! Message Store (domain core)
//!
//! ルームごとの順序付き・上限付きメッセージ履歴。順序は追加順のみで決まり、
//! 編集やリアクションで位置は変わらない。永続化は UseCase 層の `MessageStore` が担当する。

use std::collections::VecDeque;

use super::{
    entity::{ChatMessage, Reactions},
    error::MessageStoreError,
    policy,
    value_object::{DisplayName, Emoji, MessageId, MessageIdFactory, MessageText},
};

/// Default number of messages retained per room.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: VecDeque<ChatMessage>,
    limit: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl MessageLog {
    /// `limit` is clamped to at least 1.
    pub fn new(limit: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Restore a log from archived messages (oldest first), keeping the newest `limit`.
    pub fn with_messages(limit: usize, messages: Vec<ChatMessage>) -> Self {
        let mut log = Self::new(limit);
        for message in messages {
            log.append(message);
        }
        log
    }

    /// Append a message, evicting the oldest entries while over the limit.
    ///
    /// A message whose id is already in the log gets a fresh id.
    /// Returns the evicted messages (oldest first).
    pub fn append(&mut self, mut message: ChatMessage) -> Vec<ChatMessage> {
        self.ensure_unique_id(&mut message);
        self.messages.push_back(message);

        let mut evicted = Vec::new();
        while self.messages.len() > self.limit {
            if let Some(oldest) = self.messages.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Give `message` a fresh id if its id is already taken in this log.
    pub fn ensure_unique_id(&self, message: &mut ChatMessage) {
        while self.find(&message.id).is_some() {
            message.id = MessageIdFactory::generate(message.created_at);
        }
    }

    pub fn find(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }

    /// Replace the text of a message. Only the author or an admin may do so.
    pub fn edit_text(
        &mut self,
        id: &MessageId,
        text: MessageText,
        requester: &DisplayName,
        is_admin: bool,
    ) -> Result<&ChatMessage, MessageStoreError> {
        let index = self.authorized_position(id, requester, is_admin)?;
        let message = &mut self.messages[index];
        message.text = text;
        message.edited = true;
        Ok(&*message)
    }

    /// Remove a message. Only the author or an admin may do so.
    pub fn delete(
        &mut self,
        id: &MessageId,
        requester: &DisplayName,
        is_admin: bool,
    ) -> Result<ChatMessage, MessageStoreError> {
        let index = self.authorized_position(id, requester, is_admin)?;
        self.messages
            .remove(index)
            .ok_or_else(|| MessageStoreError::NotFound(id.clone()))
    }

    /// Toggle `requester`'s reaction. Anyone in the room may react.
    pub fn toggle_reaction(
        &mut self,
        id: &MessageId,
        emoji: Emoji,
        requester: &DisplayName,
    ) -> Result<&Reactions, MessageStoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| MessageStoreError::NotFound(id.clone()))?;
        let message = &mut self.messages[index];
        message.reactions.toggle(emoji, requester);
        Ok(&message.reactions)
    }

    /// Snapshot of the whole log, oldest first.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn position(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| &m.id == id)
    }

    fn authorized_position(
        &self,
        id: &MessageId,
        requester: &DisplayName,
        is_admin: bool,
    ) -> Result<usize, MessageStoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| MessageStoreError::NotFound(id.clone()))?;
        if !policy::can_mutate_message(&self.messages[index], requester, is_admin) {
            return Err(MessageStoreError::Unauthorized {
                message_id: id.clone(),
                requester: requester.clone(),
            });
        }
        Ok(index)
    }
}
