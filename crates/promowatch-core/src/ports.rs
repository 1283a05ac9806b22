use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Outbound notification channel to the operator.
///
/// One fire-and-forget text to a fixed destination. Call sites log and
/// swallow failures: a broken delivery channel must never stop event
/// processing, and there is no retry or queue.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

/// Chat metadata lookup for match notifications.
#[async_trait]
pub trait ChatResolver: Send + Sync {
    /// Display title of a chat, if the backend can resolve one.
    async fn chat_title(&self, chat_id: ChatId) -> Option<String>;
}
