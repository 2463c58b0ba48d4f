//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the gateway. Ports exist for:
//! - Durable list storage (could swap MySQL -> Postgres)
//! - The moderation notification channel (could swap Telegram -> Discord)
//! - The third-party game-metadata lookup
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Storage Port
// =============================================================================
pub use repos::{BlacklistRow, ListStore, WhitelistRow};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{DetectableGames, ModerationNotifier};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{DetectError, NotifyError, StoreError};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockDetectableGames, MockModerationNotifier};

#[cfg(test)]
pub use repos::MockListStore;

#[cfg(test)]
pub use testing::MockClockPort;
