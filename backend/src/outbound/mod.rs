//! Outbound adapters: PostgreSQL persistence and the remote user directory.

pub mod directory;
pub mod persistence;
