use crossterm::event::{KeyCode, KeyEvent};

use crate::model::{NewTag, TagColor, TagPatch};
use crate::ops::tags::TagError;
use crate::tui::app::{App, ConfirmAction, Mode, TagForm, TagFormField, TagFormTarget};
use crate::tui::text_field::TextField;

use super::*;

pub(super) fn open_tag_manager(app: &mut App) {
    app.tags_cursor = app.tags_cursor.min(app.tags().len().saturating_sub(1));
    app.tag_form = None;
    app.mode = Mode::Tags;
}

pub(super) fn handle_tags(app: &mut App, key: KeyEvent) {
    if app.tag_form.is_some() {
        handle_tag_form(app, key);
        return;
    }

    let count = app.tags().len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('g') => app.mode = Mode::Navigate,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => {
            if app.tags_cursor + 1 < count {
                app.tags_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => app.tags_cursor = app.tags_cursor.saturating_sub(1),
        KeyCode::Char('a') => {
            app.tag_form = Some(TagForm {
                target: TagFormTarget::Add,
                field: TagFormField::Name,
                name: TextField::default(),
                color: TagColor::random(),
                error: None,
            });
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(tag) = app.selected_tag() {
                let form = TagForm {
                    target: TagFormTarget::Edit(tag.id.clone()),
                    field: TagFormField::Name,
                    name: TextField::with_text(&tag.name),
                    color: tag.color,
                    error: None,
                };
                app.tag_form = Some(form);
            }
        }
        KeyCode::Char('d') => {
            if let Some(tag) = app.selected_tag() {
                let action = ConfirmAction::DeleteTag {
                    id: tag.id.clone(),
                    name: tag.name.clone(),
                };
                app.confirm = Some(action);
                app.mode = Mode::Confirm;
            }
        }
        _ => {}
    }
}

fn handle_tag_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.tag_form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.tag_form = None,
        KeyCode::Enter => submit_tag_form(app),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.field = match form.field {
                TagFormField::Name => TagFormField::Color,
                TagFormField::Color => TagFormField::Name,
            };
        }
        KeyCode::Left if form.field == TagFormField::Color => form.color = form.color.prev(),
        KeyCode::Right | KeyCode::Char(' ') if form.field == TagFormField::Color => {
            form.color = form.color.next();
        }
        _ => {
            if form.field == TagFormField::Name && edit_text(&mut form.name, key) {
                form.error = None;
            }
        }
    }
}

fn submit_tag_form(app: &mut App) {
    let Some(form) = app.tag_form.as_ref() else {
        return;
    };
    let name = form.name.text().to_string();
    let result = match &form.target {
        TagFormTarget::Add => app
            .agenda
            .add_tag(NewTag {
                name: name.clone(),
                color: form.color,
            })
            .map(|added| added.ok_or(())),
        TagFormTarget::Edit(id) => {
            let patch = TagPatch {
                name: Some(name.clone()),
                color: Some(form.color),
            };
            let id = id.clone();
            app.agenda.edit_tag(&id, patch).map(|()| Ok(id))
        }
    };

    match result {
        Ok(Ok(id)) => {
            app.tag_form = None;
            if let Some(idx) = app.tags().iter().position(|t| t.id == id) {
                app.tags_cursor = idx;
            }
        }
        // Same name as an existing tag: nothing is added
        Ok(Err(())) => {
            app.tag_form = None;
            app.set_status(format!("tag {} already exists", name.trim()));
        }
        Err(e @ (TagError::Invalid(_) | TagError::DuplicateName(_))) => {
            if let Some(form) = app.tag_form.as_mut() {
                form.error = Some(e.to_string());
            }
        }
        Err(e) => {
            app.tag_form = None;
            app.report(e);
        }
    }
}

/// Remove a tag and detach it from the loaded tasks
pub(super) fn confirm_delete_tag(app: &mut App, id: &str) {
    match app.agenda.remove_tag(id) {
        Ok(tag) => app.set_status(format!("deleted tag {}", tag.name)),
        Err(e) => app.report(e),
    }
    app.tags_cursor = app.tags_cursor.min(app.tags().len().saturating_sub(1));
    app.clamp_cursors();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::*;

    fn add_tag(app: &mut App, name: &str) {
        press(app, KeyCode::Char('a'));
        type_str(app, name);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn add_tag_from_manager() {
        let mut app = app_with_tasks(&[], &[]);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.mode, Mode::Tags);
        add_tag(&mut app, "work");
        assert!(app.tag_form.is_none());
        assert_eq!(app.tags().len(), 1);
        assert_eq!(app.tags()[0].name, "WORK");
    }

    #[test]
    fn duplicate_tag_is_a_no_op() {
        let mut app = app_with_tasks(&[], &[]);
        press(&mut app, KeyCode::Char('g'));
        add_tag(&mut app, "work");
        add_tag(&mut app, "Work");
        assert_eq!(app.tags().len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("tag Work already exists"));
    }

    #[test]
    fn short_name_shows_inline_error() {
        let mut app = app_with_tasks(&[], &[]);
        press(&mut app, KeyCode::Char('g'));
        add_tag(&mut app, "x");
        let form = app.tag_form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("tag name must be 2 to 24 characters"));
        assert!(app.tags().is_empty());
    }

    #[test]
    fn edit_tag_color() {
        let mut app = app_with_tasks(&[], &[]);
        press(&mut app, KeyCode::Char('g'));
        add_tag(&mut app, "home");
        let before = app.tags()[0].color;
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tags()[0].color, before.next());
        assert_eq!(app.tags()[0].name, "HOME");
    }

    #[test]
    fn delete_tag_after_confirm() {
        let mut app = app_with_tasks(&[], &[]);
        press(&mut app, KeyCode::Char('g'));
        add_tag(&mut app, "home");
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode, Mode::Tags);
        assert!(app.tags().is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
    }
}
