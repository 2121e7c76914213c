use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::storage::{GLOBAL_TASKS_KEY, MemoryStorage, Storage, date_key};
use crate::model::{Config, NewTask, Task};
use crate::ops::agenda::Agenda;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// The viewed date every test app opens on (a Tuesday)
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

fn collection(titles: &[&str]) -> String {
    let tasks: Vec<Task> = titles.iter().map(|t| Task::new(NewTask::titled(*t))).collect();
    serde_json::to_string(&tasks).unwrap()
}

/// An in-memory app on [`test_date`], with `today` pinned to the same day.
/// Global tasks carry no timestamps so they are visible on every date.
pub fn app_with_tasks(daily: &[&str], global: &[&str]) -> App {
    let storage = MemoryStorage::new()
        .with_entry(&date_key(test_date()), &collection(daily))
        .with_entry(GLOBAL_TASKS_KEY, &collection(global));
    let storage: Box<dyn Storage> = Box::new(storage);
    let agenda = Agenda::open(storage, test_date(), &Default::default()).unwrap();
    let mut app = App::new(agenda, &Config::default(), None);
    app.today = test_date();
    app
}
