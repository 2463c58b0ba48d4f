//! Error types for port operations.

/// Durable storage errors with operation context for tracing.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }
}

/// Notification channel errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    RequestFailed(String),
    #[error("Notification rejected by the channel: {0}")]
    Rejected(String),
}

/// Game-metadata lookup errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DetectError {
    #[error("Metadata request failed: {0}")]
    RequestFailed(String),
    #[error("Metadata service returned status {0}")]
    Status(u16),
}
