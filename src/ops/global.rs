use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::io::storage::{GLOBAL_TASKS_KEY, Storage, StorageError};
use crate::model::tag::Tag;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::ops::collection::{load_entries, save_entries};
use crate::ops::daily::{check_tag_ref, coerce_tag, log_removal};
use crate::ops::reducer::{Action, Completion, TaskError, reduce};
use crate::ops::validate::{validate_new_task, validate_patch};

/// The single date-independent task collection.
///
/// Completing a global task stamps `finished_at`; un-completing clears it.
/// Which tasks show up on a given day is decided by [`is_visible_on`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalStore {
    tasks: Vec<Task>,
}

impl GlobalStore {
    pub fn load<S: Storage + ?Sized>(storage: &mut S, tags: &[Tag]) -> Result<Self, StorageError> {
        let tasks = load_entries(storage, GLOBAL_TASKS_KEY, |task: Task| {
            Some(coerce_tag(task, tags))
        })?;
        Ok(GlobalStore { tasks })
    }

    /// Every global task, visible or not
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Global tasks shown when viewing `date`, in local time
    pub fn visible_on(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| is_visible_on(t, date, &Local))
            .collect()
    }

    pub fn add<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        data: NewTask,
        tags: &[Tag],
    ) -> Result<String, TaskError> {
        self.add_at(storage, data, tags, Utc::now())
    }

    /// Add with `created_at` set to `now`
    pub fn add_at<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        data: NewTask,
        tags: &[Tag],
        now: DateTime<Utc>,
    ) -> Result<String, TaskError> {
        let data = validate_new_task(data)?;
        check_tag_ref(data.tag.as_deref(), tags)?;
        let mut task = Task::new(data);
        task.created_at = Some(now);
        let id = task.id.clone();
        self.commit(storage, Action::Add(task), now)?;
        Ok(id)
    }

    pub fn edit<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &str,
        patch: TaskPatch,
        tags: &[Tag],
    ) -> Result<(), TaskError> {
        self.edit_at(storage, id, patch, tags, Utc::now())
    }

    pub fn edit_at<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &str,
        patch: TaskPatch,
        tags: &[Tag],
        now: DateTime<Utc>,
    ) -> Result<(), TaskError> {
        let patch = validate_patch(patch)?;
        if let Some(tag) = &patch.tag {
            check_tag_ref(tag.as_deref(), tags)?;
        }
        let action = Action::Edit {
            id: id.to_string(),
            patch,
        };
        self.commit(storage, action, now)
    }

    pub fn toggle<S: Storage + ?Sized>(&mut self, storage: &mut S, id: &str) -> Result<bool, TaskError> {
        self.toggle_at(storage, id, Utc::now())
    }

    pub fn toggle_at<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, TaskError> {
        self.commit(storage, Action::Toggle(id.to_string()), now)?;
        Ok(self.get(id).is_some_and(|t| t.is_completed))
    }

    pub fn remove<S: Storage + ?Sized>(&mut self, storage: &mut S, id: &str) -> Result<Task, TaskError> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        self.commit(storage, Action::Remove(id.to_string()), Utc::now())?;
        log_removal(storage, GLOBAL_TASKS_KEY, &removed);
        Ok(removed)
    }

    fn commit<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<(), TaskError> {
        let next = reduce(&self.tasks, &action, Completion::StampedAt(now))?;
        save_entries(storage, GLOBAL_TASKS_KEY, &next)?;
        self.tasks = next;
        Ok(())
    }
}

/// Whether a global task shows up when viewing `date`.
///
/// Tasks missing either timestamp are always visible. Otherwise the task is
/// visible from the start of its creation day to the end of its finishing
/// day, both inclusive, with day boundaries taken in `tz`.
pub fn is_visible_on<Tz: TimeZone>(task: &Task, date: NaiveDate, tz: &Tz) -> bool {
    let (Some(created), Some(finished)) = (task.created_at, task.finished_at) else {
        return true;
    };
    let first_day = created.with_timezone(tz).date_naive();
    let last_day = finished.with_timezone(tz).date_naive();
    first_day <= date && date <= last_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn spanning(created: DateTime<Utc>, finished: Option<DateTime<Utc>>) -> Task {
        Task {
            created_at: Some(created),
            finished_at: finished,
            is_completed: finished.is_some(),
            ..Task::new(NewTask::titled("global"))
        }
    }

    #[test]
    fn visible_between_created_and_finished_inclusive() {
        let task = spanning(at(1, 15), Some(at(3, 8)));
        assert!(!is_visible_on(&task, day(2023, 12, 31), &Utc));
        assert!(is_visible_on(&task, day(2024, 1, 1), &Utc));
        assert!(is_visible_on(&task, day(2024, 1, 2), &Utc));
        assert!(is_visible_on(&task, day(2024, 1, 3), &Utc));
        assert!(!is_visible_on(&task, day(2024, 1, 4), &Utc));
    }

    #[test]
    fn visible_everywhere_without_both_stamps() {
        let open = spanning(at(5, 0), None);
        assert!(is_visible_on(&open, day(2024, 1, 1), &Utc));
        assert!(is_visible_on(&open, day(2030, 1, 1), &Utc));

        let legacy = Task::new(NewTask::titled("no stamps"));
        assert!(is_visible_on(&legacy, day(1999, 1, 1), &Utc));
    }

    #[test]
    fn day_boundaries_follow_timezone() {
        let plus_five = chrono::FixedOffset::east_opt(5 * 3600).unwrap();
        // 2024-01-03 22:00 UTC is already Jan 4 at UTC+5
        let task = spanning(at(1, 12), Some(at(3, 22)));
        assert!(!is_visible_on(&task, day(2024, 1, 4), &Utc));
        assert!(is_visible_on(&task, day(2024, 1, 4), &plus_five));
    }

    #[test]
    fn add_stamps_created_at() {
        let mut storage = MemoryStorage::new();
        let mut store = GlobalStore::default();
        let id = store
            .add_at(&mut storage, NewTask::titled("Renew passport"), &[], at(1, 9))
            .unwrap();
        let task = store.get(&id).unwrap();
        assert_eq!(task.created_at, Some(at(1, 9)));
        assert_eq!(task.finished_at, None);
        assert!(storage.contains_key(GLOBAL_TASKS_KEY));
    }

    #[test]
    fn toggle_stamps_then_clears_finished_at() {
        let mut storage = MemoryStorage::new();
        let mut store = GlobalStore::default();
        let id = store
            .add_at(&mut storage, NewTask::titled("x"), &[], at(1, 9))
            .unwrap();
        let before = store.clone();

        assert!(store.toggle_at(&mut storage, &id, at(3, 10)).unwrap());
        assert_eq!(store.get(&id).unwrap().finished_at, Some(at(3, 10)));

        assert!(!store.toggle_at(&mut storage, &id, at(4, 10)).unwrap());
        assert_eq!(store, before);

        let reloaded = GlobalStore::load(&mut storage, &[]).unwrap();
        assert_eq!(reloaded, before);
    }

    #[test]
    fn edit_completion_stamps_finished_at() {
        let mut storage = MemoryStorage::new();
        let mut store = GlobalStore::default();
        let id = store
            .add_at(&mut storage, NewTask::titled("x"), &[], at(1, 9))
            .unwrap();
        let patch = TaskPatch {
            is_completed: Some(true),
            ..Default::default()
        };
        store.edit_at(&mut storage, &id, patch, &[], at(2, 18)).unwrap();
        assert_eq!(store.get(&id).unwrap().finished_at, Some(at(2, 18)));
    }

    #[test]
    fn remove_unknown_id_is_an_error() {
        let mut storage = MemoryStorage::new();
        let mut store = GlobalStore::default();
        assert!(matches!(
            store.remove(&mut storage, "ghost"),
            Err(TaskError::NotFound(_))
        ));
    }

    #[test]
    fn corrupt_global_collection_resets() {
        let mut storage = MemoryStorage::new().with_entry(GLOBAL_TASKS_KEY, "null");
        let store = GlobalStore::load(&mut storage, &[]).unwrap();
        assert!(store.tasks().is_empty());
        assert!(!storage.contains_key(GLOBAL_TASKS_KEY));
        assert_eq!(storage.recovered.len(), 1);
    }
}
