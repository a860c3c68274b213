//! Authorization Policy
//!
//! 副作用のない判定関数。管理者や作者は要求ごとに変わり得るため、結果はキャッシュせず毎回評価する。

use super::{
    entity::ChatMessage,
    room::Room,
    value_object::{ConnectionId, DisplayName},
};

/// `connection_id` がこのルームの現在の管理者かどうか
pub fn can_moderate(room: &Room, connection_id: &ConnectionId) -> bool {
    room.admin() == Some(connection_id)
}

/// メッセージの作者、またはルーム管理者であれば編集・削除できる
pub fn can_mutate_message(message: &ChatMessage, requester: &DisplayName, is_admin: bool) -> bool {
    &message.author == requester || is_admin
}
