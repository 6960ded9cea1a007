//! Reply keyboard helpers for Telegram messages.

use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

use crate::router::Keyboard;
use crate::typograf::EntityType;

/// One-row keyboard with a `/set_type NAME` button per entity type.
pub fn entity_chooser() -> KeyboardMarkup {
    let row: Vec<KeyboardButton> = EntityType::ALL
        .iter()
        .map(|t| KeyboardButton::new(format!("/set_type {t}")))
        .collect();
    KeyboardMarkup::new(vec![row]).resize_keyboard()
}

/// Telegram markup for a router keyboard change.
pub fn reply_markup(keyboard: Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::EntityChooser => ReplyMarkup::Keyboard(entity_chooser()),
        Keyboard::Remove => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}
