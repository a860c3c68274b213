//! Infrastructure layer: concrete implementations of the domain's collaborator traits.

pub mod archive;
pub mod dto;
pub mod message_pusher;
pub mod repository;
