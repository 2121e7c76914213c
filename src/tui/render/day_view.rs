use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::empty_day_message;
use crate::model::{Scope, Task};
use crate::tui::app::App;
use crate::tui::text_field::{display_width, truncate_to_width};

/// Render the viewed day's tasks above the visible global tasks
pub fn render_day_view(frame: &mut Frame, app: &App, area: Rect) {
    let globals = app.list(Scope::Global).len() as u16;
    // Header + rows + one blank line, at most half the area
    let global_height = (globals + 2).max(3).min(area.height / 2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(global_height)])
        .split(area);

    render_task_list(frame, app, chunks[0], Scope::Daily);
    render_task_list(frame, app, chunks[1], Scope::Global);
}

fn render_task_list(frame: &mut Frame, app: &App, area: Rect, scope: Scope) {
    if area.height == 0 {
        return;
    }
    let bg = app.theme.background;
    let focused = app.focus == scope;
    let tasks = app.list(scope);
    let width = area.width as usize;

    let title = match scope {
        Scope::Daily => " Tasks",
        Scope::Global => " Global",
    };
    let title_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };
    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled(title, title_style),
        Span::styled(
            format!(" ({})", tasks.len()),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ])];

    if tasks.is_empty() {
        let text = match scope {
            Scope::Daily => empty_day_message(app.agenda.date(), app.today),
            Scope::Global => "No global tasks".to_string(),
        };
        lines.push(Line::from(Span::styled(
            format!("   {}", text),
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the cursor row on screen
    let rows = (area.height as usize).saturating_sub(1).max(1);
    let cursor = app.cursor(scope);
    let offset = (cursor + 1).saturating_sub(rows);
    for (idx, task) in tasks.iter().enumerate().skip(offset).take(rows) {
        let selected = focused && idx == cursor;
        lines.push(task_line(app, task, selected, width));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// One row: marker, checkbox, title, tag name, then the description dimmed
fn task_line<'a>(app: &App, task: &Task, selected: bool, width: usize) -> Line<'a> {
    let row_bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let base = Style::default().bg(row_bg);

    let mut spans: Vec<Span> = Vec::new();
    if selected {
        spans.push(Span::styled(
            " \u{258E}",
            base.fg(app.theme.selection_border),
        ));
    } else {
        spans.push(Span::styled("  ", base));
    }

    let (check, check_color) = if task.is_completed {
        ("[x] ", app.theme.green)
    } else {
        ("[ ] ", app.theme.dim)
    };
    spans.push(Span::styled(check, base.fg(check_color)));

    let title_style = if task.is_completed {
        base.fg(app.theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        base.fg(app.theme.text_bright)
    } else {
        base.fg(app.theme.text)
    };

    let tag = task.tag.as_deref().and_then(|id| app.agenda.tag(id));
    let tag_text = tag.map(|t| format!("  {}", t.name)).unwrap_or_default();
    let used = 6 + display_width(&tag_text);
    let title = truncate_to_width(&task.title, width.saturating_sub(used));
    let mut used = used + display_width(&title);
    spans.push(Span::styled(title, title_style));

    if let Some(tag) = tag {
        spans.push(Span::styled(
            tag_text,
            base.fg(app.theme.tag_color(tag.color)).add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(first) = task.description.lines().next()
        && !first.trim().is_empty()
        && used + 3 < width
    {
        let desc = truncate_to_width(first, width - used - 2);
        used += 2 + display_width(&desc);
        spans.push(Span::styled("  ", base));
        spans.push(Span::styled(desc, base.fg(app.theme.dim)));
    }

    if selected && used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}
