//! Domain errors.

use thiserror::Error;

use super::value_object::{DisplayName, MessageId};

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("{field} contains control characters")]
    ControlCharacters { field: &'static str },
    #[error("invalid connection id: {0}")]
    InvalidConnectionId(String),
}

/// Message Store の操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageStoreError {
    /// 対象のメッセージが履歴に存在しない
    #[error("message '{0}' not found")]
    NotFound(MessageId),
    /// 作者でも管理者でもない
    #[error("'{requester}' is not allowed to modify message '{message_id}'")]
    Unauthorized {
        message_id: MessageId,
        requester: DisplayName,
    },
}

/// Persistence collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("archive I/O failed: {0}")]
    Io(String),
    #[error("archive could not be encoded or decoded: {0}")]
    Serialization(String),
}

/// MessagePusher errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
    #[error("failed to encode event: {0}")]
    EncodeFailed(String),
}
