use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::io::storage::Storage;
use crate::model::task::{Scope, Task};
use crate::ops::agenda::Agenda;
use crate::ops::tags::TagStore;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Description,
    /// Name of the attached tag
    Tag,
}

impl MatchField {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Description => "description",
            MatchField::Tag => "tag",
        }
    }
}

/// A search hit for one task field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub scope: Scope,
    pub task_id: String,
    pub field: MatchField,
    /// Byte ranges of the matches within the field
    pub spans: Vec<Range<usize>>,
}

/// Compile a user pattern; matching is case-insensitive
pub fn build_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search the viewed day and the global tasks visible on it
pub fn search_agenda<S: Storage>(agenda: &Agenda<S>, re: &Regex) -> Vec<SearchHit> {
    let mut hits = search_tasks(agenda.tasks().iter(), Scope::Daily, agenda.tags(), re);
    hits.extend(search_tasks(
        agenda.visible_globals(),
        Scope::Global,
        agenda.tags(),
        re,
    ));
    hits
}

/// Search titles, descriptions and tag names of `tasks`
pub fn search_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    scope: Scope,
    tags: &TagStore,
    re: &Regex,
) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for task in tasks {
        let tag_name = task.tag.as_deref().and_then(|id| tags.get(id)).map(|t| t.name.as_str());
        let fields = [
            (MatchField::Title, Some(task.title.as_str())),
            (MatchField::Description, Some(task.description.as_str())),
            (MatchField::Tag, tag_name),
        ];
        for (field, text) in fields {
            let Some(text) = text else { continue };
            let spans = find_matches(re, text);
            if !spans.is_empty() {
                hits.push(SearchHit {
                    scope,
                    task_id: task.id.clone(),
                    field,
                    spans,
                });
            }
        }
    }
    hits
}
