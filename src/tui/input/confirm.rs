use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, ConfirmAction, Mode};

use super::*;

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            if let Some(action) = app.confirm.take() {
                match action {
                    ConfirmAction::DeleteTask { scope, id, .. } => {
                        app.mode = Mode::Navigate;
                        match app.agenda.remove(scope, &id) {
                            Ok(task) => app.set_status(format!("deleted \"{}\"", task.title)),
                            Err(e) => app.report(e),
                        }
                        app.clamp_cursors();
                    }
                    ConfirmAction::DeleteTag { id, .. } => {
                        app.mode = Mode::Tags;
                        confirm_delete_tag(app, &id);
                    }
                }
            } else {
                app.mode = Mode::Navigate;
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.mode = match app.confirm.take() {
                Some(ConfirmAction::DeleteTag { .. }) => Mode::Tags,
                _ => Mode::Navigate,
            };
        }
        _ => {}
    }
}
