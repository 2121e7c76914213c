use chrono::{DateTime, Utc};

use crate::io::storage::StorageError;
use crate::model::task::{Task, TaskPatch};
use crate::ops::collection::SaveError;
use crate::ops::validate::ValidationError;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("unknown tag: {0}")]
    UnknownTag(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("could not serialize tasks: {0}")]
    Serialize(serde_json::Error),
}

impl From<SaveError> for TaskError {
    fn from(e: SaveError) -> Self {
        match e {
            SaveError::Storage(e) => TaskError::Storage(e),
            SaveError::Serialize(e) => TaskError::Serialize(e),
        }
    }
}

/// A mutation of one task collection
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Append a fully built task
    Add(Task),
    /// Merge a partial edit into the task with this id
    Edit { id: String, patch: TaskPatch },
    /// Flip the completion flag
    Toggle(String),
    Remove(String),
}

/// Whether completion changes record `finished_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Daily tasks: only the flag changes
    Untracked,
    /// Global tasks: completing stamps this moment, un-completing clears it
    StampedAt(DateTime<Utc>),
}

/// Apply `action` to `state`, returning the new collection.
///
/// Edit, Toggle and Remove fail with `NotFound` when the id is absent; the
/// input is never modified.
pub fn reduce(state: &[Task], action: &Action, completion: Completion) -> Result<Vec<Task>, TaskError> {
    let mut next = state.to_vec();
    match action {
        Action::Add(task) => {
            next.push(task.clone());
        }
        Action::Edit { id, patch } => {
            let task = find_mut(&mut next, id)?;
            task.apply(patch);
            // Any edit of a completed task moves its finish to now
            if let Completion::StampedAt(now) = completion {
                task.finished_at = task.is_completed.then_some(now);
            }
        }
        Action::Toggle(id) => {
            let task = find_mut(&mut next, id)?;
            task.is_completed = !task.is_completed;
            if let Completion::StampedAt(now) = completion {
                task.finished_at = task.is_completed.then_some(now);
            }
        }
        Action::Remove(id) => {
            let idx = position(&next, id)?;
            next.remove(idx);
        }
    }
    Ok(next)
}

fn position(tasks: &[Task], id: &str) -> Result<usize, TaskError> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task, TaskError> {
    let idx = position(tasks, id)?;
    Ok(&mut tasks[idx])
}
