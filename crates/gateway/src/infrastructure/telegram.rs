//! Telegram notification channel.
//!
//! Sends pending moderation requests to the moderation group with inline
//! Approve/Deny buttons and long-polls the Bot API for the button
//! callbacks. Only the configured admin user can drive a decision from the
//! chat; everyone else gets an alert and the queue is never touched.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use listwarden_domain::{ModerationRequest, RequestId};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{ModerationNotifier, NotifyError};
use crate::use_cases::moderation::ModerationQueue;

/// Default base URL for the Telegram Bot API.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Long-poll window for getUpdates, in seconds.
const LONG_POLL_SECS: u64 = 30;

/// Back-off after a failed getUpdates call.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Shared Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        // Timeout sits above the long-poll window so getUpdates can run out
        // its server-side wait.
        let client = Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
    ) -> Result<R, NotifyError> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        let envelope: TelegramResponse<R> = response
            .json()
            .await
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        if !envelope.ok {
            return Err(NotifyError::Rejected(
                envelope.description.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        envelope
            .result
            .ok_or_else(|| NotifyError::RequestFailed("empty result".to_string()))
    }
}

// =============================================================================
// Bot API wire types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
struct TelegramResponse<R> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<R>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: String,
    callback_data: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: i64,
    text: String,
    reply_markup: InlineKeyboardMarkup,
}

#[derive(Debug, Serialize)]
struct EditMessageTextRequest {
    chat_id: i64,
    message_id: i64,
    text: String,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQueryRequest {
    callback_query_id: String,
    text: String,
    show_alert: bool,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    id: String,
    from: TelegramUser,
    #[serde(default)]
    message: Option<Message>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: i64,
    #[serde(default)]
    first_name: String,
}

#[derive(Debug, Deserialize)]
struct Message {
    message_id: i64,
    chat: Chat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

// =============================================================================
// Notifier
// =============================================================================

/// Notifier port implementation: posts a pending request to the moderation
/// group with Approve/Deny buttons.
pub struct TelegramNotifier {
    client: TelegramClient,
    moderation_chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(client: TelegramClient, moderation_chat_id: i64) -> Self {
        Self {
            client,
            moderation_chat_id,
        }
    }
}

#[async_trait]
impl ModerationNotifier for TelegramNotifier {
    async fn notify_pending(&self, request: &ModerationRequest) -> Result<(), NotifyError> {
        let text = notification_text(request)?;
        let keyboard = InlineKeyboardMarkup {
            inline_keyboard: vec![vec![
                InlineKeyboardButton {
                    text: "Approve".to_string(),
                    callback_data: format!("moderate_approve_{}", request.id),
                },
                InlineKeyboardButton {
                    text: "Deny".to_string(),
                    callback_data: format!("moderate_deny_{}", request.id),
                },
            ]],
        };

        let _: Message = self
            .client
            .call(
                "sendMessage",
                &SendMessageRequest {
                    chat_id: self.moderation_chat_id,
                    text,
                    reply_markup: keyboard,
                },
            )
            .await?;

        tracing::info!(request_id = %request.id, "Sent moderation request to Telegram");
        Ok(())
    }
}

fn notification_text(request: &ModerationRequest) -> Result<String, NotifyError> {
    let payload = serde_json::to_string_pretty(&request.entry)
        .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;
    Ok(format!(
        "New {} request (ID: {}):\n```json\n{}\n```",
        request.kind, request.id, payload
    ))
}

// =============================================================================
// Callback poller
// =============================================================================

/// Moderation action carried in a button's callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CallbackAction {
    request_id: RequestId,
    approved: bool,
}

impl CallbackAction {
    /// Parse `moderate_(approve|deny)_<request_id>` callback data.
    fn parse(data: &str) -> Option<Self> {
        let rest = data.strip_prefix("moderate_")?;
        let (action, id) = rest.split_once('_')?;
        let approved = match action {
            "approve" => true,
            "deny" => false,
            _ => return None,
        };
        let request_id = RequestId::parse(id).ok()?;
        Some(Self {
            request_id,
            approved,
        })
    }
}

/// What a processed callback reports back to the chat.
#[derive(Debug, PartialEq, Eq)]
enum CallbackOutcome {
    Unauthorized,
    Failed,
    Decided { status: &'static str },
}

/// Long-polls the Bot API and routes Approve/Deny button callbacks into the
/// moderation queue. Runs until the process exits; transport failures back
/// off and keep polling.
pub struct TelegramPoller {
    client: TelegramClient,
    queue: Arc<ModerationQueue>,
    admin_user_id: i64,
}

impl TelegramPoller {
    pub fn new(client: TelegramClient, queue: Arc<ModerationQueue>, admin_user_id: i64) -> Self {
        Self {
            client,
            queue,
            admin_user_id,
        }
    }

    pub async fn run(self) {
        tracing::info!("Telegram poller started");
        let mut offset: i64 = 0;

        loop {
            let request = GetUpdatesRequest {
                offset,
                timeout: LONG_POLL_SECS,
                allowed_updates: ["callback_query"],
            };

            match self.client.call::<Vec<Update>>("getUpdates", &request).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        if let Some(callback) = update.callback_query {
                            self.handle_callback(callback).await;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "getUpdates failed, backing off");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }

    /// Run the admin check and the queue transition for one parsed action.
    ///
    /// Transport-free so the authorization and idempotency behavior is
    /// directly testable.
    async fn process_callback(&self, from_user_id: i64, action: CallbackAction) -> CallbackOutcome {
        if from_user_id != self.admin_user_id {
            tracing::warn!(
                user_id = from_user_id,
                request_id = %action.request_id,
                "Unauthorized moderation callback"
            );
            return CallbackOutcome::Unauthorized;
        }

        if !self.queue.decide(action.request_id, action.approved).await {
            return CallbackOutcome::Failed;
        }

        CallbackOutcome::Decided {
            status: if action.approved { "Approved" } else { "Denied" },
        }
    }

    async fn handle_callback(&self, callback: CallbackQuery) {
        let Some(action) = callback.data.as_deref().and_then(CallbackAction::parse) else {
            return;
        };

        let status = match self.process_callback(callback.from.id, action).await {
            CallbackOutcome::Unauthorized => {
                self.answer(
                    &callback.id,
                    "You are not authorized to perform this action.",
                    true,
                )
                .await;
                return;
            }
            CallbackOutcome::Failed => {
                self.answer(&callback.id, "Failed to process request.", true)
                    .await;
                return;
            }
            CallbackOutcome::Decided { status } => status,
        };

        tracing::info!(
            request_id = %action.request_id,
            status,
            decided_by = %callback.from.first_name,
            "Moderation request decided via Telegram"
        );

        if let Some(message) = callback.message {
            let text = format!(
                "{}\n\nRequest {} by {}",
                message.text.unwrap_or_default(),
                status,
                callback.from.first_name
            );
            let edit = EditMessageTextRequest {
                chat_id: message.chat.id,
                message_id: message.message_id,
                text,
            };
            if let Err(e) = self
                .client
                .call::<serde_json::Value>("editMessageText", &edit)
                .await
            {
                tracing::warn!(error = %e, "Failed to edit moderation message");
            }
        }

        self.answer(&callback.id, &format!("Request {status}!"), false)
            .await;
    }

    async fn answer(&self, callback_query_id: &str, text: &str, show_alert: bool) {
        let answer = AnswerCallbackQueryRequest {
            callback_query_id: callback_query_id.to_string(),
            text: text.to_string(),
            show_alert,
        };
        if let Err(e) = self
            .client
            .call::<serde_json::Value>("answerCallbackQuery", &answer)
            .await
        {
            tracing::warn!(error = %e, "Failed to answer callback query");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use listwarden_domain::{BlacklistEntry, Entry, ModerationRequest};

    #[test]
    fn parses_approve_callback() {
        let id = RequestId::new();
        let action = CallbackAction::parse(&format!("moderate_approve_{id}"))
            .expect("approve callback parses");
        assert_eq!(action.request_id, id);
        assert!(action.approved);
    }

    #[test]
    fn parses_deny_callback() {
        let id = RequestId::new();
        let action =
            CallbackAction::parse(&format!("moderate_deny_{id}")).expect("deny callback parses");
        assert_eq!(action.request_id, id);
        assert!(!action.approved);
    }

    #[test]
    fn rejects_foreign_callback_data() {
        assert!(CallbackAction::parse("something_else").is_none());
        assert!(CallbackAction::parse("moderate_approve_not-a-uuid").is_none());
        assert!(CallbackAction::parse("moderate_maybe_00000000-0000-0000-0000-000000000000").is_none());
        assert!(CallbackAction::parse("moderate_approve").is_none());
    }

    mod poller {
        use super::*;
        use crate::infrastructure::clock::FixedClock;
        use crate::infrastructure::ports::{MockListStore, MockModerationNotifier};
        use listwarden_domain::BlacklistDraft;

        const ADMIN_ID: i64 = 42;

        fn poller_with(store: MockListStore) -> (TelegramPoller, Arc<ModerationQueue>) {
            let mut notifier = MockModerationNotifier::new();
            notifier.expect_notify_pending().returning(|_| Ok(()));
            let clock = FixedClock(
                Utc.timestamp_opt(1_700_000_000, 0)
                    .single()
                    .expect("valid ts"),
            );
            let queue = Arc::new(ModerationQueue::new(
                Arc::new(store),
                Arc::new(notifier),
                Arc::new(clock),
            ));
            // The client never sends anything in these tests.
            let client = TelegramClient::new("http://localhost:0", "test-token");
            (
                TelegramPoller::new(client, queue.clone(), ADMIN_ID),
                queue,
            )
        }

        async fn pending_blacklist(queue: &ModerationQueue) -> RequestId {
            queue
                .submit_blacklist(BlacklistDraft {
                    game_name: "Cheater".to_string(),
                })
                .await
                .expect("valid submission")
        }

        #[tokio::test]
        async fn non_admin_callbacks_never_reach_the_queue() {
            // No store expectations: an insert would panic.
            let (poller, queue) = poller_with(MockListStore::new());
            let id = pending_blacklist(&queue).await;

            let outcome = poller
                .process_callback(
                    ADMIN_ID + 1,
                    CallbackAction {
                        request_id: id,
                        approved: true,
                    },
                )
                .await;

            assert_eq!(outcome, CallbackOutcome::Unauthorized);
            assert_eq!(queue.list_pending().await.len(), 1);
        }

        #[tokio::test]
        async fn admin_approval_decides_and_writes_once() {
            let mut store = MockListStore::new();
            store
                .expect_insert_blacklist()
                .times(1)
                .returning(|_| Ok(()));
            let (poller, queue) = poller_with(store);
            let id = pending_blacklist(&queue).await;

            let action = CallbackAction {
                request_id: id,
                approved: true,
            };
            let outcome = poller.process_callback(ADMIN_ID, action).await;
            assert_eq!(outcome, CallbackOutcome::Decided { status: "Approved" });

            // A duplicated callback (double-click, retried webhook) fails
            // without a second write.
            let outcome = poller.process_callback(ADMIN_ID, action).await;
            assert_eq!(outcome, CallbackOutcome::Failed);
        }

        #[tokio::test]
        async fn admin_denial_reports_denied() {
            let (poller, queue) = poller_with(MockListStore::new());
            let id = pending_blacklist(&queue).await;

            let outcome = poller
                .process_callback(
                    ADMIN_ID,
                    CallbackAction {
                        request_id: id,
                        approved: false,
                    },
                )
                .await;
            assert_eq!(outcome, CallbackOutcome::Decided { status: "Denied" });
            assert!(queue.list_pending().await.is_empty());
        }

        #[tokio::test]
        async fn unknown_request_fails() {
            let (poller, _queue) = poller_with(MockListStore::new());

            let outcome = poller
                .process_callback(
                    ADMIN_ID,
                    CallbackAction {
                        request_id: RequestId::new(),
                        approved: true,
                    },
                )
                .await;
            assert_eq!(outcome, CallbackOutcome::Failed);
        }
    }

    #[test]
    fn notification_text_names_kind_id_and_payload() {
        let entry = Entry::Blacklist(BlacklistEntry {
            game_name: "Cheater".to_string(),
        });
        let submitted_at = Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid ts");
        let request = ModerationRequest::new(RequestId::new(), entry, submitted_at);

        let text = notification_text(&request).expect("renders");
        assert!(text.starts_with(&format!("New blacklist request (ID: {})", request.id)));
        assert!(text.contains("```json"));
        assert!(text.contains("\"gameName\": \"Cheater\""));
    }
}
