use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::text_field::TextField;

/// Normalize key events from terminals using the kitty keyboard protocol.
///
/// Kitty sends `Char(lowercase) + SHIFT` instead of `Char(UPPERCASE)`, and
/// `Char(base_symbol) + SHIFT` instead of `Char(shifted_symbol)`. For
/// traditional terminals this is a no-op.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if let Some(shifted) = shift_symbol(c) {
            key.code = KeyCode::Char(shifted);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}

/// US-layout shifted symbol for the keys we bind
fn shift_symbol(c: char) -> Option<char> {
    match c {
        '/' => Some('?'),
        ';' => Some(':'),
        _ => None,
    }
}

/// Apply a line-editing key to a text field. Returns false for keys that
/// aren't editing keys so the caller can handle them.
pub(super) fn edit_text(field: &mut TextField, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => field.delete_word(),
        (KeyModifiers::CONTROL, KeyCode::Char('a')) => field.home(),
        (KeyModifiers::CONTROL, KeyCode::Char('e')) => field.end(),
        (_, KeyCode::Backspace) => field.backspace(),
        (_, KeyCode::Delete) => field.delete(),
        (_, KeyCode::Left) => field.left(),
        (_, KeyCode::Right) => field.right(),
        (_, KeyCode::Home) => field.home(),
        (_, KeyCode::End) => field.end(),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => field.insert(c),
        _ => return false,
    }
    true
}
