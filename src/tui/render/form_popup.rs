use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::{RESERVED_TAG_NAME, Scope};
use crate::tui::app::{App, FormField, FormTarget, TagFormField, TagFormTarget};
use crate::tui::text_field::TextField;

use super::centered_fixed;

const LABEL_W: usize = 8;

/// Render the task add/edit form as a popup over the content area
pub fn render_task_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form else {
        return;
    };
    let title = match &form.target {
        FormTarget::Add(Scope::Daily) => " New task ",
        FormTarget::Add(Scope::Global) => " New global task ",
        FormTarget::Edit { .. } => " Edit task ",
    };

    let tag_name = form
        .tag
        .as_deref()
        .and_then(|id| app.agenda.tag(id))
        .map(|t| (t.name.clone(), app.theme.tag_color(t.color)));
    let (tag_text, tag_color) = tag_name.unwrap_or_else(|| (RESERVED_TAG_NAME.to_string(), app.theme.dim));

    let mut lines = vec![
        Line::from(""),
        text_row(app, "Title", &form.title, form.field == FormField::Title),
        text_row(app, "Desc", &form.description, form.field == FormField::Description),
        choice_row(app, "Tag", tag_text, tag_color, form.field == FormField::Tag),
    ];
    push_footer(app, &mut lines, form.error.as_deref());

    render_popup(frame, app, area, title, lines);
}

/// Render the tag add/edit form over the tag manager
pub fn render_tag_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.tag_form else {
        return;
    };
    let title = match form.target {
        TagFormTarget::Add => " New tag ",
        TagFormTarget::Edit(_) => " Edit tag ",
    };
    let mut lines = vec![
        Line::from(""),
        text_row(app, "Name", &form.name, form.field == TagFormField::Name),
        choice_row(
            app,
            "Color",
            form.color.to_string(),
            app.theme.tag_color(form.color),
            form.field == TagFormField::Color,
        ),
    ];
    push_footer(app, &mut lines, form.error.as_deref());

    render_popup(frame, app, area, title, lines);
}

fn render_popup(frame: &mut Frame, app: &App, area: Rect, title: &str, lines: Vec<Line>) {
    let height = lines.len() as u16 + 2;
    let popup = centered_fixed(70, height, area);
    frame.render_widget(Clear, popup);

    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border).bg(bg))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn label<'a>(app: &App, name: &str, active: bool) -> Span<'a> {
    let style = if active {
        Style::default()
            .fg(app.theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim)
    };
    Span::styled(format!(" {:<width$}", name, width = LABEL_W), style)
}

/// A text input row; the active one shows a block cursor
fn text_row<'a>(app: &App, name: &str, field: &TextField, active: bool) -> Line<'a> {
    let text_style = Style::default().fg(app.theme.text_bright);
    let mut spans = vec![label(app, name, active)];
    if active {
        let (before, after) = field.split_at_cursor();
        spans.push(Span::styled(before.to_string(), text_style));
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight),
        ));
        spans.push(Span::styled(after.to_string(), text_style));
    } else {
        spans.push(Span::styled(
            field.text().to_string(),
            Style::default().fg(app.theme.text),
        ));
    }
    Line::from(spans)
}

/// A row cycled with ←/→
fn choice_row<'a>(
    app: &App,
    name: &str,
    value: String,
    color: ratatui::style::Color,
    active: bool,
) -> Line<'a> {
    let arrow = Style::default().fg(if active { app.theme.highlight } else { app.theme.dim });
    Line::from(vec![
        label(app, name, active),
        Span::styled("\u{2039} ", arrow),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(" \u{203A}", arrow),
    ])
}

fn push_footer(app: &App, lines: &mut Vec<Line>, error: Option<&str>) {
    lines.push(Line::from(""));
    if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(app.theme.red),
        )));
    }
    lines.push(Line::from(Span::styled(
        " Tab next field  \u{2190}\u{2192} change  Enter save  Esc cancel",
        Style::default().fg(app.theme.dim),
    )));
}
