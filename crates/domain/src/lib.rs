//! ListWarden domain library.
//!
//! Core types for the moderation gateway: list entries, their validation
//! rules, and the moderation request lifecycle. This crate is pure - no
//! async, no I/O, no framework types.

pub mod entry;
pub mod error;
pub mod ids;
pub mod moderation;

pub use entry::{
    BlacklistDraft, BlacklistEntry, Entry, EntryKind, WhitelistDraft, WhitelistEntry,
};
pub use error::DomainError;
pub use ids::RequestId;
pub use moderation::{Decision, ModerationRequest};
