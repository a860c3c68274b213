//! JSON ファイルを使った MessageArchive 実装
//!
//! ## 保存形式
//!
//! ```text
//! { "<room>": [ { "id", "username", "text", "email", "reactions", "time", "edited" }, ... ], ... }
//! ```
//!
//! ## 書き込み
//!
//! - ドキュメント全体をメモリに保持し、保存のたびにファイル全体を書き直す
//! - 一時ファイルに書いてから rename するため、途中で落ちても壊れたファイルは残らない
//! - 書き込みはドキュメントのロックで直列化される
//!
//! ## 読み込み
//!
//! - 古いサーバーが書いたレコード（本文が空・欠落、長いユーザー名など）も検証せずに復元する
//! - レコードとして解釈できない要素はファイルに残し、保存時にルームの先頭へそのまま書き戻す

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ChatMessage, MessageArchive, PersistenceError, RoomName},
    infrastructure::dto::archive::{ArchiveDocument, MessageRecord, StoredRecord},
};

pub struct JsonFileMessageArchive {
    path: PathBuf,
    document: Mutex<ArchiveDocument>,
}

impl JsonFileMessageArchive {
    /// Open (or create) the archive file at `path`.
    ///
    /// A file that cannot be decoded is moved aside to `<path>.corrupt` and an
    /// empty archive is used instead.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::Io(format!("{}: {}", parent.display(), e)))?;
        }

        let document = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => ArchiveDocument::new(),
            Ok(bytes) => match serde_json::from_slice::<ArchiveDocument>(&bytes) {
                Ok(document) => document,
                Err(e) => {
                    let aside = sibling(&path, ".corrupt");
                    tracing::error!(
                        "Archive '{}' is corrupt ({}); moving it to '{}' and starting empty",
                        path.display(),
                        e,
                        aside.display()
                    );
                    tokio::fs::rename(&path, &aside)
                        .await
                        .map_err(|e| PersistenceError::Io(e.to_string()))?;
                    ArchiveDocument::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ArchiveDocument::new(),
            Err(e) => {
                return Err(PersistenceError::Io(format!("{}: {}", path.display(), e)));
            }
        };

        let archive = Self {
            path,
            document: Mutex::new(document),
        };
        {
            let document = archive.document.lock().await;
            archive.write_document(&document).await?;
            tracing::info!(
                "Message archive '{}' opened ({} room(s))",
                archive.path.display(),
                document.len()
            );
        }
        Ok(archive)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_document(&self, document: &ArchiveDocument) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        let tmp = sibling(&self.path, ".tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| PersistenceError::Io(format!("{}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| PersistenceError::Io(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}

/// `<path><suffix>` next to `path`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[async_trait]
impl MessageArchive for JsonFileMessageArchive {
    async fn load(&self, room: &RoomName) -> Result<Vec<ChatMessage>, PersistenceError> {
        let document = self.document.lock().await;
        let Some(records) = document.get(room.as_str()) else {
            return Ok(Vec::new());
        };

        let mut messages = Vec::with_capacity(records.len());
        for record in records {
            match record {
                StoredRecord::Message(record) => messages.push(ChatMessage::from(record.clone())),
                StoredRecord::Unreadable(raw) => tracing::warn!(
                    "Archived record in room '{}' is unreadable and stays on disk as is: {}",
                    room,
                    raw
                ),
            }
        }
        Ok(messages)
    }

    async fn save(
        &self,
        room: &RoomName,
        messages: &[ChatMessage],
    ) -> Result<(), PersistenceError> {
        let mut document = self.document.lock().await;
        let records = document.entry(room.as_str().to_string()).or_default();
        records.retain(|record| matches!(record, StoredRecord::Unreadable(_)));
        records.extend(
            messages
                .iter()
                .map(|message| StoredRecord::Message(MessageRecord::from(message))),
        );

        if let Err(e) = self.write_document(&document).await {
            tracing::error!(
                "Failed to persist room '{}' to '{}': {}",
                room,
                self.path.display(),
                e
            );
            return Err(e);
        }
        tracing::debug!("Persisted {} message(s) for room '{}'", messages.len(), room);
        Ok(())
    }
}
