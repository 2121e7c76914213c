use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ConfirmAction, Mode};
use crate::tui::text_field::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint): (Vec<Span>, &str) = match app.mode {
        Mode::Confirm => {
            let prompt = match &app.confirm {
                Some(ConfirmAction::DeleteTask { title, .. }) => {
                    format!("Delete \"{}\"?", title)
                }
                Some(ConfirmAction::DeleteTag { name, .. }) => {
                    format!("Delete tag {}? It is removed from every task.", name)
                }
                None => String::new(),
            };
            (
                vec![Span::styled(prompt, Style::default().fg(app.theme.red).bg(bg))],
                "y delete  n cancel",
            )
        }
        Mode::DatePrompt => {
            // Date prompt: :input▌
            let (before, after) = app.date_input.split_at_cursor();
            (
                vec![
                    Span::styled(
                        format!(":{}", before),
                        Style::default().fg(app.theme.text_bright).bg(bg),
                    ),
                    Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
                    Span::styled(
                        after.to_string(),
                        Style::default().fg(app.theme.text_bright).bg(bg),
                    ),
                ],
                "YYYY-MM-DD, today, +N  Enter go  Esc cancel",
            )
        }
        Mode::Navigate | Mode::Form | Mode::Tags => {
            let spans = match &app.status_message {
                Some(msg) => {
                    let color = if msg.starts_with("error:") {
                        app.theme.red
                    } else {
                        app.theme.text
                    };
                    vec![Span::styled(format!(" {}", msg), Style::default().fg(color).bg(bg))]
                }
                None => Vec::new(),
            };
            let hint = if !app.ui_config.show_key_hints {
                ""
            } else if app.mode == Mode::Tags {
                "a add  e edit  d delete  Esc back"
            } else if app.mode == Mode::Navigate {
                "a add  Space done  ? help  q quit"
            } else {
                ""
            };
            (spans, hint)
        }
    };

    // Right-align the hint when it fits
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if !hint.is_empty() && content_width + hint_width + 1 < width {
        let padding = width - content_width - hint_width - 1;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
