//! UseCase 層のエラー

use thiserror::Error;

use crate::domain::{DisplayName, ErrorCode, MessageStoreError};

/// セッションのイベント処理で発生するエラー
///
/// いずれもクライアントの要求を拒否するだけで、接続は維持される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// join する前、またはルームから外された後の要求
    #[error("connection has not joined a room")]
    NotJoined,
    /// 接続がすでに閉じられている（kick 直後など）
    #[error("connection is closing")]
    ConnectionClosed,
    #[error("only the room admin may {0}")]
    NotAdmin(&'static str),
    #[error("no member named '{0}' in the room")]
    MemberNotFound(DisplayName),
    #[error(transparent)]
    MessageStore(#[from] MessageStoreError),
}

impl SessionError {
    /// Code reported to the client when rejections are surfaced
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotJoined | Self::ConnectionClosed => ErrorCode::NotJoined,
            Self::NotAdmin(_) => ErrorCode::Forbidden,
            Self::MemberNotFound(_) => ErrorCode::NotFound,
            Self::MessageStore(MessageStoreError::NotFound(_)) => ErrorCode::NotFound,
            Self::MessageStore(MessageStoreError::Unauthorized { .. }) => ErrorCode::Forbidden,
        }
    }
}

/// ルーム情報取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}
