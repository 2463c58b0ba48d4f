//! The moderation queue: submission, listing, and the approve/deny
//! transition.
//!
//! The queue is the sole owner of every `ModerationRequest` for the life of
//! the process. The HTTP layer and the Telegram callback handler each hold
//! an `Arc` to the same queue and go through [`ModerationQueue::decide`];
//! neither front references the other.

use std::sync::Arc;

use listwarden_domain::{
    BlacklistDraft, BlacklistEntry, DomainError, Entry, ModerationRequest, RequestId,
    WhitelistDraft, WhitelistEntry,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{ClockPort, ListStore, ModerationNotifier};

/// Submission failure.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] DomainError),
}

/// In-memory moderation queue.
///
/// Requests are kept in submission order and retained after they are
/// decided; pending requests do not survive a restart.
pub struct ModerationQueue {
    requests: RwLock<Vec<ModerationRequest>>,
    store: Arc<dyn ListStore>,
    notifier: Arc<dyn ModerationNotifier>,
    clock: Arc<dyn ClockPort>,
}

impl ModerationQueue {
    pub fn new(
        store: Arc<dyn ListStore>,
        notifier: Arc<dyn ModerationNotifier>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            requests: RwLock::new(Vec::new()),
            store,
            notifier,
            clock,
        }
    }

    /// Validate a whitelist submission and queue it for moderation.
    pub async fn submit_whitelist(&self, draft: WhitelistDraft) -> Result<RequestId, SubmitError> {
        let entry = Entry::Whitelist(WhitelistEntry::from_draft(draft)?);
        Ok(self.enqueue(entry).await)
    }

    /// Validate a blacklist submission and queue it for moderation.
    pub async fn submit_blacklist(&self, draft: BlacklistDraft) -> Result<RequestId, SubmitError> {
        let entry = Entry::Blacklist(BlacklistEntry::from_draft(draft)?);
        Ok(self.enqueue(entry).await)
    }

    async fn enqueue(&self, entry: Entry) -> RequestId {
        let request = ModerationRequest::new(RequestId::new(), entry, self.clock.now());
        let id = request.id;
        let snapshot = request.clone();

        {
            let mut requests = self.requests.write().await;
            requests.push(request);
        }

        tracing::info!(request_id = %id, kind = %snapshot.kind, game = snapshot.entry.game_name(), "Queued moderation request");

        // Fire-and-forget dispatch: a notification failure must not fail the
        // submission. The request stays decidable over HTTP either way.
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify_pending(&snapshot).await {
                tracing::warn!(
                    request_id = %snapshot.id,
                    error = %e,
                    "Failed to dispatch moderation notification"
                );
            }
        });

        id
    }

    /// All requests still awaiting a decision, in submission order.
    pub async fn list_pending(&self) -> Vec<ModerationRequest> {
        let requests = self.requests.read().await;
        requests
            .iter()
            .filter(|r| r.decision.is_undecided())
            .cloned()
            .collect()
    }

    /// Apply a moderator decision.
    ///
    /// Returns `false` when the id is unknown or the request was already
    /// decided; replays never reach the store. The decision flag flips under
    /// the write lock before the store write starts, so of any number of
    /// racing calls exactly one observes `Undecided` and at most one insert
    /// happens. A failed store write does not revert the decision.
    pub async fn decide(&self, id: RequestId, approved: bool) -> bool {
        let entry = {
            let mut requests = self.requests.write().await;
            let Some(request) = requests.iter_mut().find(|r| r.id == id) else {
                return false;
            };
            if !request.decide(approved) {
                return false;
            }
            request.entry.clone()
        };

        if approved {
            let written = match &entry {
                Entry::Whitelist(e) => self.store.insert_whitelist(e).await,
                Entry::Blacklist(e) => self.store.insert_blacklist(e).await,
            };
            if let Err(e) = written {
                // The moderation outcome is authoritative even when
                // persistence lags; surfaced in the logs, not rolled back.
                tracing::error!(
                    request_id = %id,
                    error = %e,
                    "Approved entry could not be written to the store"
                );
            }
        }

        tracing::info!(request_id = %id, approved, "Moderation request decided");
        true
    }
}
