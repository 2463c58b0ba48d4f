//! Application state and composition.

use std::sync::Arc;

use crate::api::auth::AdminCredentials;
use crate::infrastructure::ports::{DetectableGames, ListStore};
use crate::use_cases::moderation::ModerationQueue;

/// Main application state.
///
/// Built once at startup and handed to the HTTP router via Axum state; the
/// Telegram poller holds its own `Arc` to the same [`ModerationQueue`], so
/// both fronts drive one set of requests.
pub struct App {
    pub queue: Arc<ModerationQueue>,
    pub store: Arc<dyn ListStore>,
    pub detect: Arc<dyn DetectableGames>,
    pub admin_credentials: AdminCredentials,
}

impl App {
    pub fn new(
        queue: Arc<ModerationQueue>,
        store: Arc<dyn ListStore>,
        detect: Arc<dyn DetectableGames>,
        admin_credentials: AdminCredentials,
    ) -> Self {
        Self {
            queue,
            store,
            detect,
            admin_credentials,
        }
    }
}
