//! Configuration loading.
//!
//! Loads `typobot.toml` (or `--config` / `$TYPOBOT_CONFIG`), then applies
//! environment overrides. A missing file yields defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::typograf::DEFAULT_TIMEOUT;

/// Env var naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "TYPOBOT_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Telegram transport settings.
    pub telegram: TelegramConfig,
    /// Typograf client settings.
    pub typograf: TypografConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Telegram transport settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Environment variable name holding the bot token.
    pub token_env: String,
    /// Address the webhook server binds to.
    pub listen: String,
    /// Port the webhook server binds to.
    pub port: u16,
    /// Public base URL for the webhook; long polling when absent.
    pub public_url: Option<String>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token_env: "TELEGRAM_TOKEN".to_owned(),
            listen: "0.0.0.0".to_owned(),
            port: 8443,
            public_url: None,
        }
    }
}

/// Typograf client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypografConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TypografConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl TypografConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for rotated JSON log files.
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Load configuration from `explicit_path` (or the default location)
    /// and apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(explicit_path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit_path {
            Some(p) => p.to_path_buf(),
            None => config_path_with(|key| std::env::var(key).ok()),
        };
        let mut config = load_from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function so tests don't touch the process environment.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("TELEGRAM_PORT") {
            match v.parse() {
                Ok(port) => self.telegram.port = port,
                Err(_) => tracing::warn!(
                    var = "TELEGRAM_PORT",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("HEROKU_URL") {
            self.telegram.public_url = Some(v);
        }
        if let Some(v) = env("TYPOBOT_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => self.typograf.timeout_secs = secs,
                Err(_) => tracing::warn!(
                    var = "TYPOBOT_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("TYPOBOT_LOG_DIR") {
            self.logging.dir = PathBuf::from(v);
        }
    }

    /// Resolve the bot token from the env var named by `telegram.token_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or empty.
    pub fn bot_token(&self, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<BotToken> {
        let name = &self.telegram.token_env;
        match env(name.as_str()) {
            Some(token) if !token.trim().is_empty() => Ok(BotToken(token.trim().to_owned())),
            _ => Err(anyhow::anyhow!("missing bot token: set {name}")),
        }
    }
}

/// Resolve the config file path using a custom env resolver.
pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    env(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("typobot.toml"))
}

fn load_from_file(path: &Path) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::info!(path = %path.display(), "loading config from file");
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config at {}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(anyhow::anyhow!(
            "failed to read config at {}: {e}",
            path.display()
        )),
    }
}

/// Telegram bot token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(__REDACTED__)")
    }
}

/// Build the webhook URL Telegram should post updates to.
///
/// The path is the bot token appended to the public base URL, so only
/// Telegram knows where to deliver updates.
///
/// # Errors
///
/// Returns an error if the result is not a valid URL.
pub fn webhook_url(public_url: &str, token: &BotToken) -> anyhow::Result<Url> {
    let base = public_url.trim_end_matches('/');
    Url::parse(&format!("{base}/{}", token.expose()))
        .with_context(|| format!("invalid webhook base url {public_url:?}"))
}
