use crossterm::event::{KeyCode, KeyEvent};

use crate::model::{NewTask, Scope, TaskPatch};
use crate::ops::reducer::TaskError;
use crate::tui::app::{App, FormField, FormTarget, Mode, TaskForm};
use crate::tui::text_field::TextField;

use super::*;

pub(super) fn open_add_form(app: &mut App, scope: Scope) {
    app.form = Some(TaskForm {
        target: FormTarget::Add(scope),
        field: FormField::Title,
        title: TextField::default(),
        description: TextField::default(),
        tag: None,
        error: None,
    });
    app.mode = Mode::Form;
}

pub(super) fn open_edit_form(app: &mut App) {
    let Some(task) = app.selected_task() else {
        return;
    };
    let form = TaskForm {
        target: FormTarget::Edit {
            scope: app.focus,
            id: task.id.clone(),
        },
        field: FormField::Title,
        title: TextField::with_text(&task.title),
        description: TextField::with_text(&task.description),
        tag: task.tag.clone(),
        error: None,
    };
    app.form = Some(form);
    app.mode = Mode::Form;
}

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let tag_ids: Vec<String> = app.tags().iter().map(|t| t.id.clone()).collect();
    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => submit_form(app),
        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
        KeyCode::Left if form.field == FormField::Tag => {
            form.tag = cycle_tag(&tag_ids, form.tag.as_deref(), -1);
        }
        KeyCode::Right | KeyCode::Char(' ') if form.field == FormField::Tag => {
            form.tag = cycle_tag(&tag_ids, form.tag.as_deref(), 1);
        }
        _ => {
            if let Some(field) = form.active_text_mut()
                && edit_text(field, key)
            {
                form.error = None;
            }
        }
    }
}

/// Step through "no tag" followed by every tag, wrapping at both ends
fn cycle_tag(ids: &[String], current: Option<&str>, step: isize) -> Option<String> {
    let slots = ids.len() as isize + 1;
    let pos = current
        .and_then(|c| ids.iter().position(|id| id == c))
        .map_or(0, |i| i as isize + 1);
    let next = (pos + step).rem_euclid(slots);
    if next == 0 {
        None
    } else {
        ids.get(next as usize - 1).cloned()
    }
}

fn submit_form(app: &mut App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let scope = form.scope();
    let result = match &form.target {
        FormTarget::Add(scope) => {
            let data = NewTask {
                title: form.title.text().to_string(),
                description: form.description.text().to_string(),
                tag: form.tag.clone(),
            };
            app.agenda.add(*scope, data).map(Some)
        }
        FormTarget::Edit { scope, id } => {
            let patch = TaskPatch {
                title: Some(form.title.text().to_string()),
                description: Some(form.description.text().to_string()),
                tag: Some(form.tag.clone()),
                is_completed: None,
            };
            app.agenda.edit(*scope, id, patch).map(|()| None)
        }
    };

    match result {
        Ok(added) => {
            app.form = None;
            app.mode = Mode::Navigate;
            app.focus = scope;
            if let Some(id) = added {
                select_task(app, scope, &id);
            }
            app.clamp_cursors();
        }
        // Stay in the form until the input is fixed
        Err(TaskError::Invalid(e)) => {
            if let Some(form) = app.form.as_mut() {
                form.error = Some(e.to_string());
            }
        }
        Err(e) => {
            app.form = None;
            app.mode = Mode::Navigate;
            app.report(e);
        }
    }
}

/// Put the cursor on a newly added task, if its list shows it
fn select_task(app: &mut App, scope: Scope, id: &str) {
    match app.list(scope).iter().position(|t| t.id == id) {
        Some(idx) => match scope {
            Scope::Daily => app.daily_cursor = idx,
            Scope::Global => app.global_cursor = idx,
        },
        None => app.set_status("added; not visible on this date"),
    }
}
