use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Scope;
use crate::tui::app::App;

/// Render the tag manager: one row per tag with its color and usage
/// count among the loaded tasks
pub fn render_tags_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let tags = app.tags();

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled(
            " Tags",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", tags.len()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ])];

    if tags.is_empty() {
        lines.push(Line::from(Span::styled(
            "   No tags yet. Press a to add one.",
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let rows = (area.height as usize).saturating_sub(1).max(1);
    let offset = (app.tags_cursor + 1).saturating_sub(rows);
    for (idx, tag) in tags.iter().enumerate().skip(offset).take(rows) {
        let selected = idx == app.tags_cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let base = Style::default().bg(row_bg);
        let uses = [Scope::Daily, Scope::Global]
            .iter()
            .flat_map(|&scope| app.list(scope))
            .filter(|t| t.tag.as_deref() == Some(tag.id.as_str()))
            .count();

        let marker = if selected { " \u{258E}" } else { "  " };
        let name = format!("{:<26}", tag.name);
        let color = format!("{:<8}", tag.color);
        let count = format!("{} here", uses);
        let used = 2 + 2 + name.chars().count() + color.chars().count() + count.len();

        let mut spans = vec![
            Span::styled(marker, base.fg(app.theme.selection_border)),
            Span::styled("\u{25CF} ", base.fg(app.theme.tag_color(tag.color))),
            Span::styled(
                name,
                base.fg(app.theme.tag_color(tag.color))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(color, base.fg(app.theme.text)),
            Span::styled(count, base.fg(app.theme.dim)),
        ];
        if selected && used < width {
            spans.push(Span::styled(" ".repeat(width - used), base));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
