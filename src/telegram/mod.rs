//! Telegram adapter: teloxide dispatcher and message handler.
//!
//! Receives updates by webhook (when a public URL is configured) or long
//! polling, hands each message to the [`SessionRouter`] and sends the
//! reply back with the requested keyboard.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::{debug, info, warn};

use crate::config::{webhook_url, BotToken, TelegramConfig};
use crate::logging::redact_bot_tokens;
use crate::router::{Inbound, SessionRouter};

pub mod ui;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Run the Telegram bot until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the webhook address or URL is invalid, or the
/// webhook cannot be registered with Telegram.
pub async fn run_telegram(
    token: &BotToken,
    settings: &TelegramConfig,
    router: Arc<SessionRouter>,
) -> anyhow::Result<()> {
    let bot = Bot::new(token.expose());

    let handler = Update::filter_message().endpoint(handle_message);

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![router])
        .enable_ctrlc_handler()
        .build();

    match settings.public_url.as_deref() {
        Some(public_url) => {
            let url = webhook_url(public_url, token)?;
            let addr: SocketAddr = format!("{}:{}", settings.listen, settings.port)
                .parse()
                .with_context(|| {
                    format!("invalid listen address {}:{}", settings.listen, settings.port)
                })?;

            info!(
                %addr,
                host = url.host_str().unwrap_or_default(),
                "telegram webhook starting"
            );
            let listener = webhooks::axum(bot, webhooks::Options::new(addr, url))
                .await
                .map_err(|e| {
                    anyhow::anyhow!(
                        "failed to set up telegram webhook: {}",
                        redact_bot_tokens(&e.to_string())
                    )
                })?;

            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("telegram webhook listener error"),
                )
                .await;
        }
        None => {
            info!("telegram long polling starting");
            dispatcher.dispatch().await;
        }
    }

    info!("telegram dispatcher stopped");
    Ok(())
}

// ---------------------------------------------------------------------------
// Message handler
// ---------------------------------------------------------------------------

/// Route one message and send the reply, if any.
///
/// Send failures are logged and swallowed so one bad chat cannot stop
/// the dispatcher.
async fn handle_message(bot: Bot, msg: Message, router: Arc<SessionRouter>) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let inbound = Inbound::from_text(msg.text());
    debug!(chat_id = chat_id.0, ?inbound, "telegram message received");

    let Some(reply) = router.handle(chat_id.0, inbound).await else {
        return Ok(());
    };

    let mut req = bot.send_message(chat_id, reply.text);
    if let Some(keyboard) = reply.keyboard {
        req = req.reply_markup(ui::reply_markup(keyboard));
    }

    if let Err(e) = req.await {
        warn!(
            chat_id = chat_id.0,
            error = %redact_bot_tokens(&e.to_string()),
            "failed to send telegram message"
        );
    }

    Ok(())
}
