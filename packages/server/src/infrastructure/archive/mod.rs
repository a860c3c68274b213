//! MessageArchive 実装
//!
//! - `json_file`: 全ルームの履歴を1つの JSON ファイルに保存する実装
//! - `inmemory`: テストや永続化不要な起動で使うメモリ上の実装

pub mod inmemory;
pub mod json_file;

pub use inmemory::InMemoryMessageArchive;
pub use json_file::JsonFileMessageArchive;
