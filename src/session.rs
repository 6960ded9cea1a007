//! Per-chat formatting configuration.
//!
//! The [`SessionStore`] is owned by the session router. Each chat has at
//! most one [`FormattingConfig`]; chats that never ran `/set_type` use
//! the defaults without being inserted.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::typograf::FormattingConfig;

/// Chat-id keyed map of formatting configuration.
#[derive(Debug, Default)]
pub struct SessionStore {
    configs: RwLock<HashMap<i64, FormattingConfig>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the configuration for `chat_id`, or the defaults.
    pub async fn config_for(&self, chat_id: i64) -> FormattingConfig {
        self.configs
            .read()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    /// Replace the configuration for `chat_id` wholesale.
    pub async fn replace(&self, chat_id: i64, config: FormattingConfig) {
        let previous = self.configs.write().await.insert(chat_id, config);
        debug!(
            chat_id,
            entity_type = %config.entity_type,
            replaced = previous.is_some(),
            "session config updated"
        );
    }

    /// Number of chats with an explicit configuration.
    pub async fn len(&self) -> usize {
        self.configs.read().await.len()
    }

    /// Whether no chat has an explicit configuration.
    pub async fn is_empty(&self) -> bool {
        self.configs.read().await.is_empty()
    }
}
