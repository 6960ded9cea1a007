//! Log output for the bot and the `convert` command.
//!
//! The long-running bot keeps a daily JSON file next to its stderr output so
//! failed Typograf calls can be inspected after the fact. One-shot
//! conversions only log to stderr, keeping stdout for the converted text.
//! Telegram errors embed the bot token in request URLs, so anything logged
//! from the transport goes through [`redact_bot_tokens`] first.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Holds the non-blocking writer guard for file logging.
///
/// Dropping it flushes pending log entries and closes the file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Install the bot's subscriber: `typobot.log.YYYY-MM-DD` JSON files in
/// `logs_dir` plus plain stderr lines, both honouring `RUST_LOG` (`info`
/// when unset).
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init_production(logs_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create logs directory {}: {e}",
            logs_dir.display()
        )
    })?;

    let (daily_json, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, "typobot.log"));

    tracing_subscriber::registry()
        .with(env_filter_or("info"))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_writer(daily_json),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(LoggingGuard { _guard: guard })
}

/// Stderr-only logging for `typobot convert`. Quiet unless `RUST_LOG` asks.
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter_or("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn env_filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

static BOT_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d{5,}:[A-Za-z0-9_\-]{30,}").ok());

/// Replace Telegram bot tokens in `raw` with `[REDACTED]`.
///
/// Bot API errors carry request URLs of the form `.../bot<token>/method`.
pub fn redact_bot_tokens(raw: &str) -> String {
    match BOT_TOKEN.as_ref() {
        Some(regex) => regex.replace_all(raw, "[REDACTED]").into_owned(),
        None => raw.to_owned(),
    }
}
