use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Mode};

use super::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 90, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    if app.mode == Mode::Tags {
        lines.push(Line::from(Span::styled(" Tag manager", header_style)));
        add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
        add_binding(&mut lines, " a", "Add tag", key_style, desc_style);
        add_binding(&mut lines, " e/Enter", "Edit tag", key_style, desc_style);
        add_binding(&mut lines, " d", "Delete tag", key_style, desc_style);
        add_binding(&mut lines, " Esc/g", "Back to tasks", key_style, desc_style);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Tag form", header_style)));
        add_binding(&mut lines, " Tab", "Switch field", key_style, desc_style);
        add_binding(&mut lines, " \u{2190}\u{2192}", "Change color", key_style, desc_style);
        add_binding(&mut lines, " Enter/Esc", "Save / cancel", key_style, desc_style);
    } else {
        lines.push(Line::from(Span::styled(" Days", header_style)));
        add_binding(&mut lines, " \u{2190}\u{2192}/hl", "Previous / next day", key_style, desc_style);
        add_binding(&mut lines, " t", "Go to today", key_style, desc_style);
        add_binding(&mut lines, " :", "Go to date", key_style, desc_style);

        lines.push(Line::from(Span::styled(" Tasks", header_style)));
        add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
        add_binding(&mut lines, " Tab", "Switch day / global", key_style, desc_style);
        add_binding(&mut lines, " Space", "Toggle done", key_style, desc_style);
        add_binding(&mut lines, " a/A", "Add daily / global task", key_style, desc_style);
        add_binding(&mut lines, " e/Enter", "Edit task", key_style, desc_style);
        add_binding(&mut lines, " d", "Delete task", key_style, desc_style);

        lines.push(Line::from(Span::styled(" Other", header_style)));
        add_binding(&mut lines, " g", "Manage tags", key_style, desc_style);
        add_binding(&mut lines, " T", "Toggle light/dark", key_style, desc_style);
        add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
        add_binding(&mut lines, " q", "Quit", key_style, desc_style);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}
