use chrono::{Days, Local, NaiveDate};

use crate::io::storage::{Storage, StorageError};
use crate::model::config::TagConfig;
use crate::model::tag::{NewTag, Tag, TagPatch};
use crate::model::task::{NewTask, Scope, Task, TaskPatch};
use crate::ops::daily::DailyStore;
use crate::ops::global::GlobalStore;
use crate::ops::reducer::TaskError;
use crate::ops::tags::{TagError, TagStore};

/// One session over a storage: the viewed date and the three stores.
///
/// Tags load once at open. The daily collection is reloaded whenever the
/// viewed date changes; the global collection is loaded once and filtered
/// by the viewed date on read.
#[derive(Debug)]
pub struct Agenda<S: Storage> {
    storage: S,
    daily: DailyStore,
    global: GlobalStore,
    tags: TagStore,
}

impl<S: Storage> Agenda<S> {
    pub fn open(mut storage: S, date: NaiveDate, config: &TagConfig) -> Result<Self, StorageError> {
        let tags = TagStore::load(&mut storage, config.uppercase_names)?;
        let daily = DailyStore::load(&mut storage, date, tags.tags())?;
        let global = GlobalStore::load(&mut storage, tags.tags())?;
        Ok(Agenda {
            storage,
            daily,
            global,
            tags,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.daily.date()
    }

    /// Tasks of the viewed date
    pub fn tasks(&self) -> &[Task] {
        self.daily.tasks()
    }

    /// All global tasks, regardless of visibility
    pub fn global_tasks(&self) -> &[Task] {
        self.global.tasks()
    }

    /// Global tasks visible on the viewed date
    pub fn visible_globals(&self) -> Vec<&Task> {
        self.global.visible_on(self.date())
    }

    pub fn tags(&self) -> &TagStore {
        &self.tags
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.get(id)
    }

    #[cfg(test)]
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // -----------------------------------------------------------------------
    // Viewed date
    // -----------------------------------------------------------------------

    pub fn set_date(&mut self, date: NaiveDate) -> Result<(), StorageError> {
        self.daily = DailyStore::load(&mut self.storage, date, self.tags.tags())?;
        Ok(())
    }

    /// Move the viewed date by `days` (negative goes back). Out of range
    /// dates leave the view where it is.
    pub fn shift_days(&mut self, days: i64) -> Result<(), StorageError> {
        match shift_date(self.date(), days) {
            Some(date) => self.set_date(date),
            None => Ok(()),
        }
    }

    pub fn go_today(&mut self) -> Result<(), StorageError> {
        self.set_date(Local::now().date_naive())
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub fn add(&mut self, scope: Scope, data: NewTask) -> Result<String, TaskError> {
        let tags = self.tags.tags();
        match scope {
            Scope::Daily => self.daily.add(&mut self.storage, data, tags),
            Scope::Global => self.global.add(&mut self.storage, data, tags),
        }
    }

    pub fn edit(&mut self, scope: Scope, id: &str, patch: TaskPatch) -> Result<(), TaskError> {
        let tags = self.tags.tags();
        match scope {
            Scope::Daily => self.daily.edit(&mut self.storage, id, patch, tags),
            Scope::Global => self.global.edit(&mut self.storage, id, patch, tags),
        }
    }

    pub fn toggle(&mut self, scope: Scope, id: &str) -> Result<bool, TaskError> {
        match scope {
            Scope::Daily => self.daily.toggle(&mut self.storage, id),
            Scope::Global => self.global.toggle(&mut self.storage, id),
        }
    }

    pub fn remove(&mut self, scope: Scope, id: &str) -> Result<Task, TaskError> {
        match scope {
            Scope::Daily => self.daily.remove(&mut self.storage, id),
            Scope::Global => self.global.remove(&mut self.storage, id),
        }
    }

    /// Find a task by id in the viewed day, then among all global tasks
    pub fn find(&self, id: &str) -> Option<(Scope, &Task)> {
        self.daily
            .get(id)
            .map(|t| (Scope::Daily, t))
            .or_else(|| self.global.get(id).map(|t| (Scope::Global, t)))
    }

    // -----------------------------------------------------------------------
    // Tags
    // -----------------------------------------------------------------------

    pub fn add_tag(&mut self, data: NewTag) -> Result<Option<String>, TagError> {
        self.tags.add(&mut self.storage, data)
    }

    pub fn edit_tag(&mut self, id: &str, patch: TagPatch) -> Result<(), TagError> {
        self.tags.edit(&mut self.storage, id, patch)
    }

    /// Remove a tag and reload both task collections so references to it
    /// read as "no tag"
    pub fn remove_tag(&mut self, id: &str) -> Result<Tag, TagError> {
        let removed = self.tags.remove(&mut self.storage, id)?;
        let date = self.date();
        self.daily = DailyStore::load(&mut self.storage, date, self.tags.tags())?;
        self.global = GlobalStore::load(&mut self.storage, self.tags.tags())?;
        Ok(removed)
    }
}

/// `date` moved by a signed number of days
pub fn shift_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let n = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(n)
    } else {
        date.checked_sub_days(n)
    }
}

/// Parse a date as typed by the user, relative to `today`.
///
/// Accepts `YYYY-MM-DD`, `DD.MM.YYYY`, `today`, `tomorrow`, `yesterday`
/// and signed day offsets like `+2` or `-1`.
pub fn parse_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "" | "today" => return Some(today),
        "tomorrow" => return shift_date(today, 1),
        "yesterday" => return shift_date(today, -1),
        _ => {}
    }
    if input.starts_with(['+', '-']) {
        return input.parse::<i64>().ok().and_then(|n| shift_date(today, n));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d.%m.%Y"))
        .ok()
}
