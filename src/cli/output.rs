use chrono::NaiveDate;
use serde::Serialize;

use crate::model::tag::Tag;
use crate::model::task::{Scope, Task};
use crate::ops::search::SearchHit;
use crate::ops::tags::TagStore;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub scope: Scope,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

#[derive(Serialize)]
pub struct TagJson {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: String,
    pub tasks: Vec<TaskJson>,
    pub global: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub scope: Scope,
    pub task_id: String,
    pub title: String,
    pub field: String,
    /// `[start, end)` byte offsets of each match within the field
    pub spans: Vec<[usize; 2]>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, scope: Scope, tags: &TagStore) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        scope,
        title: task.title.clone(),
        description: task.description.clone(),
        done: task.is_completed,
        tag: task.tag.as_deref().and_then(|id| tags.get(id)).map(tag_to_json),
        created_at: task.created_at.map(|t| t.to_rfc3339()),
        finished_at: task.finished_at.map(|t| t.to_rfc3339()),
    }
}

pub fn tag_to_json(tag: &Tag) -> TagJson {
    TagJson {
        id: tag.id.clone(),
        name: tag.name.clone(),
        color: tag.color.to_string(),
    }
}

pub fn hit_to_json(hit: &SearchHit, title: &str) -> SearchHitJson {
    SearchHitJson {
        scope: hit.scope,
        task_id: hit.task_id.clone(),
        title: title.to_string(),
        field: hit.field.as_str().to_string(),
        spans: hit.spans.iter().map(|r| [r.start, r.end]).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task, tags: &TagStore) -> String {
    let check = if task.is_completed { 'x' } else { ' ' };
    let tag_str = task
        .tag
        .as_deref()
        .and_then(|id| tags.get(id))
        .map(|t| format!(" #{}", t.name))
        .unwrap_or_default();
    format!("[{}] {} {}{}", check, short_id(&task.id), task.title, tag_str)
}

/// Format a task with its description indented beneath
pub fn format_task_detail(task: &Task, tags: &TagStore) -> Vec<String> {
    let mut lines = vec![format_task_line(task, tags)];
    for line in task.description.lines() {
        lines.push(format!("      {}", line));
    }
    lines
}

/// Format a tag for the tag listing
pub fn format_tag_line(tag: &Tag) -> String {
    format!("{}  {:<24} {}", short_id(&tag.id), tag.name, tag.color)
}

/// First 8 characters of an id, enough to tell tasks apart on screen
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Header line for a day listing, e.g. `== Tue Jan 02 2024 ==`
pub fn format_day_header(date: NaiveDate) -> String {
    format!("== {} ==", format_long_date(date))
}

pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Text shown for a day with no tasks
pub fn empty_day_message(date: NaiveDate, today: NaiveDate) -> String {
    let verb = if date < today { "had" } else { "have" };
    let when = if date == today {
        "today".to_string()
    } else {
        format_long_date(date)
    };
    format!("You {} nothing to do on {}", verb, when)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::NewTask;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn empty_day_wording() {
        assert_eq!(
            empty_day_message(day(2), day(2)),
            "You have nothing to do on today"
        );
        assert_eq!(
            empty_day_message(day(1), day(2)),
            "You had nothing to do on Mon Jan 01 2024"
        );
        assert_eq!(
            empty_day_message(day(3), day(2)),
            "You have nothing to do on Wed Jan 03 2024"
        );
    }

    #[test]
    fn task_line_shows_state_short_id_and_title() {
        let task = Task {
            id: "0123456789abcdef".into(),
            is_completed: true,
            ..Task::new(NewTask::titled("Buy milk"))
        };
        assert_eq!(
            format_task_line(&task, &TagStore::default()),
            "[x] 01234567 Buy milk"
        );
    }

    #[test]
    fn short_id_of_short_input() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("abcdefghij"), "abcdefgh");
    }
}
