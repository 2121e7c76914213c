use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Scope;
use crate::tui::app::{App, ConfirmAction, Mode};
use crate::tui::text_field::TextField;

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Viewed date
        KeyCode::Char('h') | KeyCode::Left => change_day(app, -1),
        KeyCode::Char('l') | KeyCode::Right => change_day(app, 1),
        KeyCode::Char('t') => go_today(app),
        KeyCode::Char(':') => {
            app.date_input = TextField::default();
            app.mode = Mode::DatePrompt;
        }

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Tab | KeyCode::BackTab => app.switch_focus(),

        // Tasks
        KeyCode::Char(' ') => toggle_selected(app),
        KeyCode::Char('a') => open_add_form(app, Scope::Daily),
        KeyCode::Char('A') => open_add_form(app, Scope::Global),
        KeyCode::Char('e') | KeyCode::Enter => open_edit_form(app),
        KeyCode::Char('d') => request_delete(app),

        KeyCode::Char('g') => open_tag_manager(app),
        KeyCode::Char('T') => app.toggle_theme(),
        _ => {}
    }
}

fn change_day(app: &mut App, days: i64) {
    match app.agenda.shift_days(days) {
        Ok(()) => after_date_change(app),
        Err(e) => app.report(e),
    }
}

fn go_today(app: &mut App) {
    match app.agenda.go_today() {
        Ok(()) => {
            app.today = app.agenda.date();
            after_date_change(app);
        }
        Err(e) => app.report(e),
    }
}

/// The day list is new; the global list is refiltered
pub(super) fn after_date_change(app: &mut App) {
    app.daily_cursor = 0;
    app.clamp_cursors();
}

fn toggle_selected(app: &mut App) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let (scope, id) = (app.focus, task.id.clone());
    if let Err(e) = app.agenda.toggle(scope, &id) {
        app.report(e);
    }
    // A completed global task can drop out of the visible window
    app.clamp_cursors();
}

fn request_delete(app: &mut App) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let action = ConfirmAction::DeleteTask {
        scope: app.focus,
        id: task.id.clone(),
        title: task.title.clone(),
    };
    app.confirm = Some(action);
    app.mode = Mode::Confirm;
}
