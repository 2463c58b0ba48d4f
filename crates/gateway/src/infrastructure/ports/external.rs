//! External service ports (notification channel, game-metadata lookup).

use async_trait::async_trait;
use listwarden_domain::ModerationRequest;

use super::error::{DetectError, NotifyError};

/// Outbound channel that alerts a human moderator to a new pending request
/// and carries the approve/deny controls.
///
/// Dispatch is best-effort: the queue logs failures and keeps the request
/// decidable over HTTP.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationNotifier: Send + Sync {
    async fn notify_pending(&self, request: &ModerationRequest) -> Result<(), NotifyError>;
}

/// Third-party listing of detectable games, passed through to API readers
/// verbatim.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DetectableGames: Send + Sync {
    async fn fetch_detectable(&self) -> Result<serde_json::Value, DetectError>;
}
