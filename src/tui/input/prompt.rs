use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::agenda::parse_date;
use crate::tui::app::{App, Mode};

use super::*;

/// `:` prompt: accepts the same date forms as `--date`
pub(super) fn handle_date_prompt(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.mode = Mode::Navigate,
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
            let input = app.date_input.text().trim().to_string();
            match parse_date(&input, app.today) {
                Some(date) => match app.agenda.set_date(date) {
                    Ok(()) => after_date_change(app),
                    Err(e) => app.report(e),
                },
                None => app.set_status(format!("invalid date \"{}\"", input)),
            }
        }
        _ => {
            edit_text(&mut app.date_input, key);
        }
    }
}
