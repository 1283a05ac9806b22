use chrono::{DateTime, Utc};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// One incoming message as the classifier sees it.
///
/// Produced by the adapter from the backend's update stream; the core only
/// ever reads it. Telegram-specific fields stay in the adapter.
#[derive(Clone, Debug)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub text: String,
    pub is_private: bool,
    pub timestamp: DateTime<Utc>,
}
