//! Data Transfer Objects (DTOs) for the chat server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event DTOs (inbound and outbound)
//! - `archive`: persisted message records
//! - `http`: HTTP API response DTOs

pub mod archive;
pub mod conversion;
pub mod http;
pub mod websocket;
