//! Typobot CLI entry point.
//!
//! Provides `start` to run the Telegram bot and `convert` to run a single
//! piece of text through the Typograf service from the terminal.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use typobot::config::Config;
use typobot::router::SessionRouter;
use typobot::typograf::{FormattingConfig, TypografClient};

/// Typobot — typographer bot for Telegram.
#[derive(Parser)]
#[command(name = "typobot", version, about)]
struct Cli {
    /// Path to the TOML config file (default: $TYPOBOT_CONFIG or ./typobot.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Run the Telegram bot.
    Start,
    /// Run text through the Typograf service and print the result.
    Convert {
        /// Text to convert; read from stdin when omitted.
        text: Option<String>,
        /// Entity type: LETTER, NUMBER or SYMBOL.
        #[arg(long, default_value = "SYMBOL")]
        entity_type: String,
        /// Use <br /> tags for line breaks.
        #[arg(long)]
        use_br: bool,
        /// Wrap paragraphs in <p> tags.
        #[arg(long)]
        use_p: bool,
        /// Longest span glued with non-breaking spaces (0 = service default).
        #[arg(long, default_value_t = 0)]
        max_nobr: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: failed to load .env: {e}");
        }
    }

    match cli.command {
        Command::Start => handle_start(cli.config).await,
        Command::Convert {
            text,
            entity_type,
            use_br,
            use_p,
            max_nobr,
        } => {
            let formatting = FormattingConfig::configure(&entity_type, use_br, use_p, max_nobr)?;
            handle_convert(cli.config, text, formatting).await
        }
    }
}

/// Run the bot with file + console logging.
async fn handle_start(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load(config_path.as_deref()).context("failed to load configuration")?;
    let _logging_guard = typobot::logging::init_production(&config.logging.dir)?;

    info!(version = env!("CARGO_PKG_VERSION"), "typobot starting");

    let token = config.bot_token(|key| std::env::var(key).ok())?;
    let client = TypografClient::new(config.typograf.timeout())
        .context("failed to build typograf client")?;
    let router = Arc::new(SessionRouter::new(Arc::new(client)));

    if let Err(e) = typobot::telegram::run_telegram(&token, &config.telegram, router).await {
        warn!(error = %e, "telegram adapter stopped with error");
        return Err(e);
    }

    info!("typobot shut down cleanly");
    Ok(())
}

/// Convert one text and print it to stdout.
async fn handle_convert(
    config_path: Option<PathBuf>,
    text: Option<String>,
    formatting: FormattingConfig,
) -> anyhow::Result<()> {
    typobot::logging::init_cli();
    let config = Config::load(config_path.as_deref()).context("failed to load configuration")?;

    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            buf
        }
    };

    let client = TypografClient::new(config.typograf.timeout())
        .context("failed to build typograf client")?;
    let converted = client
        .process_text(&text, &formatting)
        .await
        .context("conversion failed")?;

    println!("{converted}");
    Ok(())
}
