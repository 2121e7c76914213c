use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Legacy on-disk marker for "no tag"
pub const NO_TAG_SENTINEL: &str = "_NONE";

/// Which collection a task lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The collection of the viewed date
    #[default]
    Daily,
    /// The single date-independent collection
    Global,
}

/// A todo item, as stored in a JSON collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique id, generated at creation
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub is_completed: bool,
    /// Id of the attached tag, if any
    #[serde(
        default,
        deserialize_with = "deserialize_tag_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub tag: Option<String>,
    /// Set on global tasks when they are added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set on global tasks when they are completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the add form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub tag: Option<String>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A partial edit. `None` leaves the field untouched; `tag: Some(None)` clears the tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag: Option<Option<String>>,
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tag.is_none()
            && self.is_completed.is_none()
    }
}

impl Task {
    /// Build an uncompleted task with a fresh id
    pub fn new(data: NewTask) -> Self {
        Task {
            id: Uuid::new_v4().to_string(),
            title: data.title,
            description: data.description,
            is_completed: false,
            tag: data.tag,
            created_at: None,
            finished_at: None,
        }
    }

    /// Merge a patch into this task
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(tag) = &patch.tag {
            self.tag = tag.clone();
        }
        if let Some(done) = patch.is_completed {
            self.is_completed = done;
        }
    }
}

fn deserialize_tag_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|t| !t.is_empty() && t != NO_TAG_SENTINEL))
}
