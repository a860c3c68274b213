//! Hiroba: a room-scoped group chat server.
//!
//! Layers, from the inside out: `domain` (rooms, messages, policy), `usecase`
//! (one struct per client operation), `infrastructure` (in-memory rooms, JSON
//! archive, WebSocket fan-out, wire DTOs) and `ui` (axum routes).

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
