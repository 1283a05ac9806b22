use std::{path::PathBuf, sync::Arc};

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tokio::sync::Mutex;

use promowatch_core::{
    classifier::CoreState,
    config::RuntimeConfig,
    domain::{ChatId, InboundEvent, UserId},
    filters::FilterStore,
    ports::{ChatResolver, Notifier},
};

use crate::{BotApiNotifier, TelegramChatResolver};

#[derive(Clone)]
pub struct AppState {
    pub core: Arc<Mutex<CoreState>>,
    pub notifier: Arc<dyn Notifier>,
    pub resolver: Arc<dyn ChatResolver>,
}

/// Establish the session, announce startup, then relay every incoming
/// message through the classifier until the backend disconnects.
pub async fn run_polling(
    cfg: RuntimeConfig,
    filters: FilterStore,
    env_path: PathBuf,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    // The Bot API authenticates with the token in either mode; the flag
    // mirrors the account-vs-bot switch of the MTProto deployment and is
    // surfaced here together with the application identity.
    let me = bot.get_me().await?;
    let self_id = UserId(me.id.0 as i64);
    println!(
        "promowatch started: @{} (app id {}, {} session)",
        me.username(),
        cfg.api_id,
        if cfg.is_bot { "bot" } else { "user" }
    );
    println!("Monitored chats: {}", cfg.promo_chats.len());

    let notifier: Arc<dyn Notifier> =
        Arc::new(BotApiNotifier::new(&cfg.bot_token, cfg.operator_id));
    let resolver: Arc<dyn ChatResolver> = Arc::new(TelegramChatResolver::new(bot.clone()));

    // Startup notification, best-effort.
    if let Err(e) = notifier.notify("📌 Bot iniciado e rodando!").await {
        eprintln!("Startup notification failed: {e}");
    }

    let state = Arc::new(AppState {
        core: Arc::new(Mutex::new(CoreState::new(cfg, filters, self_id, env_path))),
        notifier,
        resolver,
    });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_channel_post().endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(event) = inbound_event(&msg) else {
        return Ok(());
    };

    // One event at a time: the lock is held across the whole classify /
    // reload / notify sequence, so the core never sees interleaved events
    // and needs no locking of its own.
    let mut core = state.core.lock().await;
    core.handle_event(&event, state.notifier.as_ref(), state.resolver.as_ref())
        .await;

    Ok(())
}

fn inbound_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?.to_string();
    // Channel posts carry no sender; 0 never collides with a real account id.
    let sender_id = msg.from().map(|u| u.id.0 as i64).unwrap_or_default();

    Some(InboundEvent {
        chat_id: ChatId(msg.chat.id.0),
        sender_id: UserId(sender_id),
        text,
        is_private: msg.chat.is_private(),
        timestamp: msg.date,
    })
}
