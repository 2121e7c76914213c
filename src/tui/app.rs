use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::storage::{FileStorage, Storage};
use crate::model::{Config, Scope, Tag, TagColor, Task, ThemeMode, UiConfig};
use crate::ops::agenda::{Agenda, parse_date};

use super::input;
use super::render;
use super::text_field::TextField;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Task add/edit form
    Form,
    /// y/n prompt for a pending delete
    Confirm,
    /// `:` prompt for jumping to a date
    DatePrompt,
    /// Tag manager (list plus optional tag form)
    Tags,
}

/// What the task form will do on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Add(Scope),
    Edit { scope: Scope, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Tag,
}

impl FormField {
    pub fn next(self) -> FormField {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Tag,
            FormField::Tag => FormField::Title,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Title => FormField::Tag,
            FormField::Description => FormField::Title,
            FormField::Tag => FormField::Description,
        }
    }
}

/// State of the open task form
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub target: FormTarget,
    pub field: FormField,
    pub title: TextField,
    pub description: TextField,
    /// Selected tag id
    pub tag: Option<String>,
    /// Inline validation message; blocks submit until fixed
    pub error: Option<String>,
}

impl TaskForm {
    pub fn scope(&self) -> Scope {
        match &self.target {
            FormTarget::Add(scope) => *scope,
            FormTarget::Edit { scope, .. } => *scope,
        }
    }

    /// The text field under the cursor, if the focused field is textual
    pub fn active_text_mut(&mut self) -> Option<&mut TextField> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Tag => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFormTarget {
    Add,
    Edit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFormField {
    Name,
    Color,
}

/// State of the open tag form inside the tag manager
#[derive(Debug, Clone, PartialEq)]
pub struct TagForm {
    pub target: TagFormTarget,
    pub field: TagFormField,
    pub name: TextField,
    pub color: TagColor,
    pub error: Option<String>,
}

/// A destructive action waiting for y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask {
        scope: Scope,
        id: String,
        title: String,
    },
    DeleteTag {
        id: String,
        name: String,
    },
}

/// Main application state
pub struct App {
    pub agenda: Agenda<Box<dyn Storage>>,
    /// Where config.toml and .state.json live; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    pub ui_config: UiConfig,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Which list the cursor is in
    pub focus: Scope,
    pub daily_cursor: usize,
    pub global_cursor: usize,
    pub form: Option<TaskForm>,
    pub tags_cursor: usize,
    pub tag_form: Option<TagForm>,
    pub confirm: Option<ConfirmAction>,
    pub date_input: TextField,
    /// Help overlay visible
    pub show_help: bool,
    /// One-shot message for the status row, cleared on the next key
    pub status_message: Option<String>,
    pub today: NaiveDate,
}

impl App {
    pub fn new(agenda: Agenda<Box<dyn Storage>>, config: &Config, data_dir: Option<PathBuf>) -> Self {
        App {
            agenda,
            data_dir,
            ui_config: config.ui.clone(),
            theme: Theme::from_config(&config.ui),
            mode: Mode::Navigate,
            should_quit: false,
            focus: Scope::Daily,
            daily_cursor: 0,
            global_cursor: 0,
            form: None,
            tags_cursor: 0,
            tag_form: None,
            confirm: None,
            date_input: TextField::default(),
            show_help: false,
            status_message: None,
            today: Local::now().date_naive(),
        }
    }

    // -----------------------------------------------------------------------
    // Lists and cursors
    // -----------------------------------------------------------------------

    /// Tasks shown in a list: the viewed day's tasks, or the visible globals
    pub fn list(&self, scope: Scope) -> Vec<&Task> {
        match scope {
            Scope::Daily => self.agenda.tasks().iter().collect(),
            Scope::Global => self.agenda.visible_globals(),
        }
    }

    pub fn cursor(&self, scope: Scope) -> usize {
        match scope {
            Scope::Daily => self.daily_cursor,
            Scope::Global => self.global_cursor,
        }
    }

    fn cursor_mut(&mut self, scope: Scope) -> &mut usize {
        match scope {
            Scope::Daily => &mut self.daily_cursor,
            Scope::Global => &mut self.global_cursor,
        }
    }

    /// Task under the cursor in the focused list
    pub fn selected_task(&self) -> Option<&Task> {
        self.list(self.focus).get(self.cursor(self.focus)).copied()
    }

    /// Move the cursor in the focused list, stopping at either end
    pub fn move_cursor(&mut self, delta: isize) {
        let focus = self.focus;
        let len = self.list(focus).len();
        let cursor = self.cursor_mut(focus);
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Keep both cursors inside their lists after the lists change
    pub fn clamp_cursors(&mut self) {
        for scope in [Scope::Daily, Scope::Global] {
            let len = self.list(scope).len();
            let cursor = self.cursor_mut(scope);
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Scope::Daily => Scope::Global,
            Scope::Global => Scope::Daily,
        };
    }

    pub fn tags(&self) -> &[Tag] {
        self.agenda.tags().tags()
    }

    pub fn selected_tag(&self) -> Option<&Tag> {
        self.tags().get(self.tags_cursor)
    }

    pub fn is_today(&self) -> bool {
        self.agenda.date() == self.today
    }

    /// Track the wall-clock date so a session left open past midnight
    /// stops treating yesterday as today. The viewed date is not moved.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    // -----------------------------------------------------------------------
    // Messages and persistence
    // -----------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    /// Surface a failed store operation on the status row
    pub fn report(&mut self, err: impl std::fmt::Display) {
        self.set_status(format!("error: {}", err));
    }

    /// Switch light/dark, keeping `[ui.colors]` overrides, and persist the choice
    pub fn toggle_theme(&mut self) {
        let mode = self.theme.mode.toggled();
        self.ui_config.theme = mode;
        self.theme = Theme::with_overrides(&self.ui_config, mode);
        if let Some(dir) = &self.data_dir
            && let Err(e) = config_io::save_theme(dir, mode)
        {
            self.report(e);
        }
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.mode
    }
}

/// Restore cursor and focus from .state.json
pub fn restore_ui_state(app: &mut App) {
    let Some(dir) = &app.data_dir else {
        return;
    };
    let Some(state) = read_ui_state(dir) else {
        return;
    };
    app.focus = state.focus;
    app.daily_cursor = state.daily_cursor;
    app.global_cursor = state.global_cursor;
    app.clamp_cursors();
}

/// Save cursor and focus to .state.json
pub fn save_ui_state(app: &App) {
    let Some(dir) = &app.data_dir else {
        return;
    };
    let state = UiState {
        focus: app.focus,
        daily_cursor: app.daily_cursor,
        global_cursor: app.global_cursor,
    };
    let _ = write_ui_state(dir, &state);
}

/// Run the TUI over the data directory, starting at `date` (default today)
pub fn run(data_dir: &Path, date: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();
    let date = match date {
        Some(raw) => parse_date(raw, today).ok_or_else(|| format!("invalid date '{}'", raw))?,
        None => today,
    };
    let (config, _doc) = config_io::read_config(data_dir)?;
    let storage: Box<dyn Storage> = Box::new(FileStorage::open(data_dir)?);
    let agenda = Agenda::open(storage, date, &config.tags)?;

    let mut app = App::new(agenda, &config, Some(data_dir.to_path_buf()));

    // Restore saved UI state
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        app.set_today(Local::now().date_naive());
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
