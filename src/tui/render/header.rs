use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::format_long_date;
use crate::tui::app::{App, Mode};

/// Render the header: viewed date on the left, view name on the right,
/// with a separator line below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // date row
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let width = area.width as usize;
    let bg_style = Style::default().bg(bg);

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled("\u{25B6}", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(" ", bg_style),
        Span::styled(
            format_long_date(app.agenda.date()),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if app.is_today() {
        spans.push(Span::styled(
            "  today",
            Style::default().fg(app.theme.green).bg(bg),
        ));
    }

    let view_name = if app.mode == Mode::Tags { "tags" } else { "tasks" };
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let right = format!("{} ", view_name);
    if content_width + right.len() < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width - right.len()),
            bg_style,
        ));
        spans.push(Span::styled(right, Style::default().fg(app.theme.dim).bg(bg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), chunks[0]);

    let sep = "\u{2500}".repeat(width);
    let sep_widget = Paragraph::new(sep).style(Style::default().fg(app.theme.dim).bg(bg));
    frame.render_widget(sep_widget, chunks[1]);
}
