use chrono::NaiveDate;

use crate::io::recovery::{RecoveryCategory, RecoveryEntry};
use crate::io::storage::{Storage, StorageError, date_key};
use crate::model::tag::Tag;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::ops::collection::{load_entries, save_entries};
use crate::ops::reducer::{Action, Completion, TaskError, reduce};
use crate::ops::validate::{validate_new_task, validate_patch};

/// The task collection of one calendar day.
///
/// Every mutation runs the reducer on a copy, writes the whole collection
/// back under the day's key, and only then replaces the in-memory list. A
/// failed write leaves the store as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStore {
    date: NaiveDate,
    tasks: Vec<Task>,
}

impl DailyStore {
    /// An empty, unloaded store for `date`
    pub fn new(date: NaiveDate) -> Self {
        DailyStore {
            date,
            tasks: Vec::new(),
        }
    }

    /// Read the collection for `date`. Missing data gives an empty list;
    /// tag references not found in `tags` are dropped.
    pub fn load<S: Storage + ?Sized>(
        storage: &mut S,
        date: NaiveDate,
        tags: &[Tag],
    ) -> Result<Self, StorageError> {
        let tasks = load_entries(storage, &date_key(date), |task: Task| {
            Some(coerce_tag(task, tags))
        })?;
        Ok(DailyStore { date, tasks })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add an uncompleted task; returns its new id
    pub fn add<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        data: NewTask,
        tags: &[Tag],
    ) -> Result<String, TaskError> {
        let data = validate_new_task(data)?;
        check_tag_ref(data.tag.as_deref(), tags)?;
        let task = Task::new(data);
        let id = task.id.clone();
        self.commit(storage, Action::Add(task))?;
        Ok(id)
    }

    pub fn edit<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &str,
        patch: TaskPatch,
        tags: &[Tag],
    ) -> Result<(), TaskError> {
        let patch = validate_patch(patch)?;
        if let Some(tag) = &patch.tag {
            check_tag_ref(tag.as_deref(), tags)?;
        }
        self.commit(
            storage,
            Action::Edit {
                id: id.to_string(),
                patch,
            },
        )
    }

    /// Flip completion; returns the new state
    pub fn toggle<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &str,
    ) -> Result<bool, TaskError> {
        self.commit(storage, Action::Toggle(id.to_string()))?;
        Ok(self.get(id).is_some_and(|t| t.is_completed))
    }

    /// Remove a task, logging it to the recovery log; returns the removed task
    pub fn remove<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &str,
    ) -> Result<Task, TaskError> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        self.commit(storage, Action::Remove(id.to_string()))?;
        log_removal(storage, &date_key(self.date), &removed);
        Ok(removed)
    }

    fn commit<S: Storage + ?Sized>(&mut self, storage: &mut S, action: Action) -> Result<(), TaskError> {
        let next = reduce(&self.tasks, &action, Completion::Untracked)?;
        save_entries(storage, &date_key(self.date), &next)?;
        self.tasks = next;
        Ok(())
    }
}

/// Drop a tag reference that does not name one of `tags`
pub(crate) fn coerce_tag(mut task: Task, tags: &[Tag]) -> Task {
    if let Some(tag) = &task.tag
        && !tags.iter().any(|t| &t.id == tag)
    {
        task.tag = None;
    }
    task
}

/// A tag set by a form must exist
pub(crate) fn check_tag_ref(tag: Option<&str>, tags: &[Tag]) -> Result<(), TaskError> {
    match tag {
        Some(id) if !tags.iter().any(|t| t.id == id) => Err(TaskError::UnknownTag(id.to_string())),
        _ => Ok(()),
    }
}

pub(crate) fn log_removal<S: Storage + ?Sized>(storage: &mut S, key: &str, task: &Task) {
    let body = serde_json::to_string_pretty(task).unwrap_or_default();
    storage.record(
        RecoveryEntry::for_key(RecoveryCategory::Delete, key, "task removed", body)
            .with_field("Task", task.id.clone()),
    );
}
