//! Room Registry (domain core)
//!
//! ルームの参加者テーブル（接続 → 表示名）と管理者ポインタを保持する。
//!
//! ## 不変条件
//!
//! - `admin` は `None` か、現在の参加者の接続 ID のいずれか
//! - 参加者は参加順に保持され、管理者の継承は「最も早く参加した残りの参加者」を選ぶ
//! - 空になったルームも履歴は保持する（ルームは明示的には削除されない）

use super::{
    entity::{Member, MembershipSnapshot},
    message_log::{DEFAULT_HISTORY_LIMIT, MessageLog},
    value_object::{ConnectionId, DisplayName, RoomName, Timestamp},
};

#[derive(Debug, Clone)]
pub struct Room {
    pub name: RoomName,
    pub created_at: Timestamp,
    /// Join order
    members: Vec<Member>,
    admin: Option<ConnectionId>,
    messages: MessageLog,
}

impl Room {
    /// Create an empty room with the default history limit
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self::with_history(name, created_at, MessageLog::new(DEFAULT_HISTORY_LIMIT))
    }

    /// Create a room around an existing (e.g. archived) message log
    pub fn with_history(name: RoomName, created_at: Timestamp, messages: MessageLog) -> Self {
        Self {
            name,
            created_at,
            members: Vec::new(),
            admin: None,
            messages,
        }
    }

    /// Add the connection, or overwrite its name/email if it is already a member.
    ///
    /// The first member of an admin-less room becomes admin.
    pub fn join(&mut self, member: Member) -> MembershipSnapshot {
        let connection_id = member.connection_id;
        match self
            .members
            .iter_mut()
            .find(|m| m.connection_id == connection_id)
        {
            Some(existing) => {
                existing.name = member.name;
                existing.email = member.email;
            }
            None => self.members.push(member),
        }

        if self.admin.is_none() {
            self.admin = Some(connection_id);
        }

        self.snapshot()
    }

    /// Remove the connection. Runs admin succession if it was the admin.
    ///
    /// Returns `None` if the connection was not a member.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        let member = self.members.remove(index);

        if self.admin.as_ref() == Some(connection_id) {
            self.admin = self.members.first().map(|m| m.connection_id);
        }

        Some(member)
    }

    pub fn admin(&self) -> Option<&ConnectionId> {
        self.admin.as_ref()
    }

    pub fn admin_name(&self) -> Option<&DisplayName> {
        let admin = self.admin.as_ref()?;
        self.member(admin).map(|m| &m.name)
    }

    pub fn member(&self, connection_id: &ConnectionId) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| &m.connection_id == connection_id)
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.member(connection_id).is_some()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Display names in join order (duplicates possible when names collide)
    pub fn member_names(&self) -> Vec<DisplayName> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    /// Every connection currently joined, in join order
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.connection_id).collect()
    }

    /// Connections whose bound display name equals `name`
    pub fn connections_named(&self, name: &DisplayName) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|m| &m.name == name)
            .map(|m| m.connection_id)
            .collect()
    }

    pub fn snapshot(&self) -> MembershipSnapshot {
        MembershipSnapshot {
            members: self.member_names(),
            admin: self.admin_name().cloned(),
        }
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageLog {
        &mut self.messages
    }

    /// `admin ∈ members ∪ {none}`
    pub fn admin_is_valid(&self) -> bool {
        match &self.admin {
            None => true,
            Some(admin) => self.is_member(admin),
        }
    }
}
