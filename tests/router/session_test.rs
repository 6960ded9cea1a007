//! `SessionStore` lookups and replacement.

use typobot::session::SessionStore;
use typobot::typograf::{EntityType, FormattingConfig};

#[tokio::test]
async fn unknown_chat_gets_defaults_without_insert() {
    let store = SessionStore::new();
    assert_eq!(store.config_for(42).await, FormattingConfig::default());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn replace_overwrites_whole_config() {
    let store = SessionStore::new();
    store
        .replace(
            42,
            FormattingConfig {
                entity_type: EntityType::Letter,
                use_break: true,
                use_paragraph: true,
                max_no_break_span: 3,
            },
        )
        .await;
    store
        .replace(42, FormattingConfig::with_entity_type(EntityType::Number))
        .await;

    let config = store.config_for(42).await;
    assert_eq!(config, FormattingConfig::with_entity_type(EntityType::Number));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn negative_chat_ids_are_distinct_sessions() {
    let store = SessionStore::new();
    store
        .replace(-100, FormattingConfig::with_entity_type(EntityType::Letter))
        .await;
    assert_eq!(store.config_for(100).await, FormattingConfig::default());
    assert_eq!(
        store.config_for(-100).await.entity_type,
        EntityType::Letter
    );
}
