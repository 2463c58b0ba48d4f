//! Use cases for the moderation workflow.

pub mod moderation;

pub use moderation::{ModerationQueue, SubmitError};
