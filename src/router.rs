//! Session router: command grammar and text relay.
//!
//! The router is transport-neutral. It turns an [`Inbound`] message into a
//! [`Reply`], reading and replacing the chat's configuration in the
//! [`SessionStore`] and calling the [`TextFormatter`] for plain text.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::session::SessionStore;
use crate::typograf::{FormattingConfig, TextFormatter};

/// Reply to `/start`.
pub const WELCOME_TEXT: &str = "Типограф — это инструмент, который приводит текст в соответствие \
с правилами экранной типографики:\n\
\u{20} — меняет неправильные кавычки на «елочки» и «лапки»;\n\
\u{20} — проставляет неразрывные пробелы;\n\
\u{20} — ставит тире вместо дефиса;\n\
\u{20} — убирает лишние пробелы;\n\
\u{20} — меняет (с) на © и т.д.\n\n\
Отправь мне сообщение с каким-нибудь текстом и увидишь, что получится.\n\n\
Меня можно немного настроить, используй команду /set_type";

/// Sent instead of a result when conversion fails for any reason.
pub const EXCEPTION_MESSAGE: &str =
    "Что-то пошло не так, мы обязательно разберёмся c этим. Приносим извинения за неудобства.";

/// Reply to messages without text.
pub const UNKNOWN_MESSAGE: &str = "Я не умею с этим работать :(";

/// Prompt shown with the entity type chooser.
pub const SET_TYPE_MESSAGE: &str = "Выбери один из варинатов:\n\
\u{20} — LETTER - верну заменяемые символы буквенным кодом;\n\
\u{20} — NUMBER - верну заменяемые символы числовым кодом;\n\
\u{20} — SYMBOL - верну готовый текст;\n";

/// Acknowledgement after a successful `/set_type`.
pub const SET_TYPE_DONE_MESSAGE: &str = "Отлично, давай проверим как это работает?";

/// Prompt after an invalid `/set_type` argument.
pub const SET_TYPE_RETRY_MESSAGE: &str = "Выбрано недопустимое значение, давай попробуем еще раз.";

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

/// A chat message as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A `/command` with whitespace-separated arguments.
    Command {
        /// Command name without the slash or `@botname` suffix.
        name: String,
        /// Arguments following the command.
        args: Vec<String>,
    },
    /// Any other text.
    Text(String),
    /// A message without text (sticker, photo, voice, ...).
    Unsupported,
}

impl Inbound {
    /// Classify a message by its text, if any.
    pub fn from_text(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return Self::Unsupported;
        };
        let Some(without_slash) = text.strip_prefix('/') else {
            return Self::Text(text.to_owned());
        };
        // A command name must follow the slash directly: "/", "/ hi" are text.
        let starts_command = without_slash
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if !starts_command {
            return Self::Text(text.to_owned());
        }

        let mut parts = without_slash.split_whitespace();
        let full_command = parts.next().unwrap_or_default();
        // Strip @bot_name suffix if present
        let name = full_command
            .split('@')
            .next()
            .unwrap_or(full_command)
            .to_owned();
        let args = parts.map(str::to_owned).collect();
        Self::Command { name, args }
    }
}

/// Reply keyboard change requested alongside a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Show the `/set_type` chooser.
    EntityChooser,
    /// Remove any custom keyboard.
    Remove,
}

/// What to send back to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text.
    pub text: String,
    /// Keyboard change, if any.
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Routes chat messages to per-chat configuration and the formatter.
pub struct SessionRouter {
    formatter: Arc<dyn TextFormatter>,
    sessions: SessionStore,
}

impl SessionRouter {
    /// Create a router with an empty session store.
    pub fn new(formatter: Arc<dyn TextFormatter>) -> Self {
        Self {
            formatter,
            sessions: SessionStore::new(),
        }
    }

    /// Session store backing this router.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one inbound message for `chat_id`.
    ///
    /// Returns `None` for commands the bot does not know; those are
    /// ignored rather than answered.
    pub async fn handle(&self, chat_id: i64, inbound: Inbound) -> Option<Reply> {
        match inbound {
            Inbound::Command { name, args } => match name.as_str() {
                "start" => Some(Reply::text(WELCOME_TEXT)),
                "set_type" => Some(self.set_type(chat_id, &args).await),
                _ => {
                    debug!(chat_id, command = %name, "ignoring unknown command");
                    None
                }
            },
            Inbound::Text(text) => Some(self.convert(chat_id, &text).await),
            Inbound::Unsupported => Some(Reply::text(UNKNOWN_MESSAGE)),
        }
    }

    async fn set_type(&self, chat_id: i64, args: &[String]) -> Reply {
        let Some(value) = args.first() else {
            return Reply::with_keyboard(SET_TYPE_MESSAGE, Keyboard::EntityChooser);
        };

        match FormattingConfig::configure(value, false, false, 0) {
            Ok(config) => {
                self.sessions.replace(chat_id, config).await;
                info!(chat_id, entity_type = %config.entity_type, "entity type changed");
                Reply::with_keyboard(SET_TYPE_DONE_MESSAGE, Keyboard::Remove)
            }
            Err(e) => {
                debug!(chat_id, error = %e, "rejected /set_type argument");
                Reply::with_keyboard(SET_TYPE_RETRY_MESSAGE, Keyboard::EntityChooser)
            }
        }
    }

    async fn convert(&self, chat_id: i64, text: &str) -> Reply {
        let config = self.sessions.config_for(chat_id).await;
        match self.formatter.convert(text, &config).await {
            Ok(converted) => Reply::text(converted),
            Err(e) => {
                warn!(
                    chat_id,
                    transport = e.is_transport(),
                    error = %e,
                    "conversion failed"
                );
                Reply::text(EXCEPTION_MESSAGE)
            }
        }
    }
}
