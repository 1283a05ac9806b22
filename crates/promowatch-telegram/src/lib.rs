//! Telegram adapter (teloxide + Bot API HTTP).
//!
//! This crate implements the `promowatch-core` ports over Telegram: the
//! polling listener that feeds `InboundEvent`s to the classifier, the
//! `get_chat` title resolver, and the notifier that POSTs straight to the
//! Bot API `sendMessage` endpoint.

use async_trait::async_trait;

use serde::Serialize;

use teloxide::prelude::*;

pub mod router;

use promowatch_core::{
    domain::{ChatId, UserId},
    errors::Error,
    ports::{ChatResolver, Notifier},
    Result,
};

/// Notifier backed by a raw Bot API `sendMessage` POST.
///
/// Deliberately independent of the polling client: confirmations reach the
/// operator through the bot identity even when the listening session runs as
/// a plain user account.
pub struct BotApiNotifier {
    http: reqwest::Client,
    endpoint: String,
    operator_chat: i64,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

impl BotApiNotifier {
    pub fn new(bot_token: &str, operator_id: UserId) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("https://api.telegram.org/bot{bot_token}/sendMessage"),
            operator_chat: operator_id.0,
        }
    }
}

#[async_trait]
impl Notifier for BotApiNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&SendMessage {
                chat_id: self.operator_chat,
                text,
            })
            .send()
            .await
            .map_err(|e| Error::External(format!("telegram sendMessage failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::External(format!(
                "telegram sendMessage returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

/// Chat title lookup over the Bot API.
pub struct TelegramChatResolver {
    bot: Bot,
}

impl TelegramChatResolver {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatResolver for TelegramChatResolver {
    async fn chat_title(&self, chat_id: ChatId) -> Option<String> {
        let chat = self
            .bot
            .get_chat(teloxide::types::ChatId(chat_id.0))
            .await
            .ok()?;
        chat.title().map(|t| t.to_string())
    }
}
