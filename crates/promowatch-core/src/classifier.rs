use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    config::RuntimeConfig,
    domain::{InboundEvent, UserId},
    filters::FilterStore,
    ports::{ChatResolver, Notifier},
    reload::{Clock, ReloadPolicy, SystemClock, RELOAD_INTERVAL},
};

/// Placeholder title when the backend cannot resolve a chat.
const UNKNOWN_CHAT_TITLE: &str = "Desconhecido";

/// All mutable relay state, owned by the event loop.
///
/// A single instance is passed by exclusive reference into the handler, which
/// makes the single-writer model explicit: a reload or a filter mutation can
/// never interleave with a read from another event.
pub struct CoreState {
    pub config: RuntimeConfig,
    pub filters: FilterStore,
    pub self_id: UserId,
    env_path: PathBuf,
    reload: ReloadPolicy,
    clock: Box<dyn Clock>,
}

impl CoreState {
    pub fn new(
        config: RuntimeConfig,
        filters: FilterStore,
        self_id: UserId,
        env_path: impl Into<PathBuf>,
    ) -> Self {
        let clock: Box<dyn Clock> = Box::new(SystemClock);
        let now = clock.now();
        Self {
            config,
            filters,
            self_id,
            env_path: env_path.into(),
            reload: ReloadPolicy::new(RELOAD_INTERVAL, now),
            clock,
        }
    }

    /// Classify one inbound event.
    ///
    /// Decision order is fixed and each step is terminal: refresh stale
    /// state, then private commands, then the monitored-chat scan. A private
    /// message never reaches the chat scan, even when its chat id is in the
    /// monitored set.
    pub async fn handle_event(
        &mut self,
        event: &InboundEvent,
        notifier: &dyn Notifier,
        resolver: &dyn ChatResolver,
    ) {
        self.refresh_if_stale();

        if event.is_private {
            self.handle_private(event, notifier).await;
            return;
        }

        self.scan_monitored(event, notifier, resolver).await;
    }

    /// Reload config and filters once the interval has elapsed.
    ///
    /// A failed reload keeps the previous state. The timer resets either way
    /// so one broken edit does not re-run the reload on every event.
    fn refresh_if_stale(&mut self) {
        let now = self.clock.now();
        if !self.reload.due(now) {
            return;
        }

        match RuntimeConfig::load(&self.env_path) {
            Ok(cfg) => {
                info!("config reloaded, monitoring {} chat(s)", cfg.promo_chats.len());
                self.config = cfg;
            }
            Err(e) => warn!("config reload failed, keeping previous: {e}"),
        }
        if let Err(e) = self.filters.load() {
            warn!("filter reload failed, keeping previous: {e}");
        }
        self.reload.mark(now);
    }

    /// Filter-management commands from the private chat with the operator.
    ///
    /// The whole message is normalized up front, so `/ADD Foo` and `/add foo`
    /// are the same command with the same argument. Anything that is not a
    /// recognized command is deliberately ignored.
    async fn handle_private(&mut self, event: &InboundEvent, notifier: &dyn Notifier) {
        let msg = event.text.trim().to_lowercase();

        if let Some(arg) = msg.strip_prefix("/add ") {
            let keyword = arg.trim();
            let text = if self.filters.add(keyword) {
                info!("filter '{keyword}' added");
                format!(
                    "✅ Filtro '{keyword}' adicionado.\nFiltros atuais: {}",
                    self.filters_joined()
                )
            } else {
                format!(
                    "⚠️ Filtro inválido ou já existe.\nFiltros atuais: {}",
                    self.filters_joined()
                )
            };
            send(notifier, &text).await;
        } else if let Some(arg) = msg.strip_prefix("/remove ") {
            let keyword = arg.trim();
            let text = if self.filters.remove(keyword) {
                info!("filter '{keyword}' removed");
                format!(
                    "✅ Filtro '{keyword}' removido.\nFiltros atuais: {}",
                    self.filters_joined()
                )
            } else {
                format!(
                    "⚠️ Filtro '{keyword}' não encontrado.\nFiltros atuais: {}",
                    self.filters_joined()
                )
            };
            send(notifier, &text).await;
        } else if msg == "/list" {
            let text = if self.filters.entries().is_empty() {
                "📋 Nenhum filtro configurado.".to_string()
            } else {
                format!("📋 Filtros atuais: {}", self.filters_joined())
            };
            send(notifier, &text).await;
        }
    }

    /// Keyword scan for messages arriving in a monitored chat.
    async fn scan_monitored(
        &mut self,
        event: &InboundEvent,
        notifier: &dyn Notifier,
        resolver: &dyn ChatResolver,
    ) {
        if !self.config.promo_chats.contains(&event.chat_id) {
            return;
        }

        // Never react to our own messages, including forwarded confirmations
        // that end up in a monitored chat.
        if event.sender_id == self.self_id {
            return;
        }

        let lowered = event.text.to_lowercase();
        if !self.filters.contains_any(&lowered) {
            return;
        }

        let title = resolver
            .chat_title(event.chat_id)
            .await
            .unwrap_or_else(|| UNKNOWN_CHAT_TITLE.to_string());
        info!("match in chat {} ({title})", event.chat_id.0);

        let text = format!("📌 Promo encontrada!\n\n{}\n\n👉 De: {title}", event.text);
        send(notifier, &text).await;
    }

    fn filters_joined(&self) -> String {
        self.filters.entries().join(", ")
    }
}

async fn send(notifier: &dyn Notifier, text: &str) {
    if let Err(e) = notifier.notify(text).await {
        warn!("notification failed: {e}");
    }
}
