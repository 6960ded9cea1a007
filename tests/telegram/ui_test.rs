//! Reply keyboard markup.

use teloxide::types::ReplyMarkup;

use typobot::router::Keyboard;
use typobot::telegram::ui::{entity_chooser, reply_markup};

#[test]
fn chooser_has_one_button_per_entity_type() {
    let markup = entity_chooser();
    assert_eq!(markup.keyboard.len(), 1);
    let labels: Vec<&str> = markup.keyboard[0].iter().map(|b| b.text.as_str()).collect();
    assert_eq!(
        labels,
        vec!["/set_type LETTER", "/set_type NUMBER", "/set_type SYMBOL"]
    );
}

#[test]
fn chooser_keyboard_maps_to_reply_keyboard() {
    assert!(matches!(
        reply_markup(Keyboard::EntityChooser),
        ReplyMarkup::Keyboard(_)
    ));
}

#[test]
fn remove_maps_to_keyboard_removal() {
    assert!(matches!(
        reply_markup(Keyboard::Remove),
        ReplyMarkup::KeyboardRemove(_)
    ));
}
