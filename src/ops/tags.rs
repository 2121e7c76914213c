use crate::io::storage::{Storage, StorageError, TAGS_KEY};
use crate::model::tag::{NewTag, TAG_NAME_MAX, TAG_NAME_MIN, Tag, TagPatch};
use crate::ops::collection::{SaveError, load_entries, save_entries};
use crate::ops::validate::{ValidationError, normalize_tag_name};

/// Error type for tag operations
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("tag not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("a tag named {0} already exists")]
    DuplicateName(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("could not serialize tags: {0}")]
    Serialize(serde_json::Error),
}

impl From<SaveError> for TagError {
    fn from(e: SaveError) -> Self {
        match e {
            SaveError::Storage(e) => TagError::Storage(e),
            SaveError::Serialize(e) => TagError::Serialize(e),
        }
    }
}

/// The user's tags, loaded once per session.
///
/// With `uppercase` set, names are stored uppercased and `NONE` is refused.
/// Name comparison is case-insensitive either way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagStore {
    tags: Vec<Tag>,
    uppercase: bool,
}

impl TagStore {
    pub fn new(uppercase: bool) -> Self {
        TagStore {
            tags: Vec::new(),
            uppercase,
        }
    }

    pub fn load<S: Storage + ?Sized>(storage: &mut S, uppercase: bool) -> Result<Self, StorageError> {
        let tags = load_entries(storage, TAGS_KEY, |tag: Tag| {
            let len = tag.name.trim().chars().count();
            (TAG_NAME_MIN..=TAG_NAME_MAX).contains(&len).then_some(tag)
        })?;
        Ok(TagStore { tags, uppercase })
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn get(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.has_name(name))
    }

    /// Look a tag up by id first, then by name
    pub fn resolve(&self, name_or_id: &str) -> Option<&Tag> {
        self.get(name_or_id).or_else(|| self.find_by_name(name_or_id))
    }

    /// Add a tag. Returns `Ok(None)` without writing anything when a tag of
    /// the same name already exists.
    pub fn add<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        data: NewTag,
    ) -> Result<Option<String>, TagError> {
        let name = normalize_tag_name(&data.name, self.uppercase)?;
        if self.find_by_name(&name).is_some() {
            return Ok(None);
        }
        let tag = Tag::new(NewTag {
            name,
            color: data.color,
        });
        let id = tag.id.clone();
        let mut next = self.tags.clone();
        next.push(tag);
        self.commit(storage, next)?;
        Ok(Some(id))
    }

    pub fn edit<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        id: &str,
        patch: TagPatch,
    ) -> Result<(), TagError> {
        let idx = self.position(id)?;
        let name = patch
            .name
            .as_deref()
            .map(|n| normalize_tag_name(n, self.uppercase))
            .transpose()?;
        if let Some(name) = &name
            && self.tags.iter().any(|t| t.id != id && t.has_name(name))
        {
            return Err(TagError::DuplicateName(name.clone()));
        }

        let mut next = self.tags.clone();
        let tag = &mut next[idx];
        if let Some(name) = name {
            tag.name = name;
        }
        if let Some(color) = patch.color {
            tag.color = color;
        }
        self.commit(storage, next)
    }

    /// Remove a tag. Tasks still pointing at it lose the reference on their
    /// next load.
    pub fn remove<S: Storage + ?Sized>(&mut self, storage: &mut S, id: &str) -> Result<Tag, TagError> {
        let idx = self.position(id)?;
        let mut next = self.tags.clone();
        let removed = next.remove(idx);
        self.commit(storage, next)?;
        Ok(removed)
    }

    fn position(&self, id: &str) -> Result<usize, TagError> {
        self.tags
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TagError::NotFound(id.to_string()))
    }

    fn commit<S: Storage + ?Sized>(&mut self, storage: &mut S, next: Vec<Tag>) -> Result<(), TagError> {
        save_entries(storage, TAGS_KEY, &next)?;
        self.tags = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use crate::model::tag::TagColor;

    fn new_tag(name: &str) -> NewTag {
        NewTag {
            name: name.into(),
            color: TagColor::Green,
        }
    }

    #[test]
    fn add_uppercases_and_persists() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(true);
        let id = store.add(&mut storage, new_tag(" work ")).unwrap().unwrap();
        assert_eq!(store.get(&id).unwrap().name, "WORK");

        let reloaded = TagStore::load(&mut storage, true).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn duplicate_add_is_a_noop() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(true);
        store.add(&mut storage, new_tag("Work")).unwrap();
        let saved = storage.get(TAGS_KEY).unwrap();

        assert_eq!(store.add(&mut storage, new_tag("WORK")).unwrap(), None);
        assert_eq!(store.add(&mut storage, new_tag("work")).unwrap(), None);
        assert_eq!(store.tags().len(), 1);
        assert_eq!(storage.get(TAGS_KEY).unwrap(), saved);
    }

    #[test]
    fn duplicate_check_ignores_case_without_uppercasing() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(false);
        store.add(&mut storage, new_tag("Home")).unwrap();
        assert_eq!(store.add(&mut storage, new_tag("home")).unwrap(), None);
        assert_eq!(store.tags()[0].name, "Home");
    }

    #[test]
    fn reserved_and_short_names_are_rejected() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(true);
        assert!(matches!(
            store.add(&mut storage, new_tag("none")),
            Err(TagError::Invalid(ValidationError::ReservedName(_)))
        ));
        assert!(matches!(
            store.add(&mut storage, new_tag("x")),
            Err(TagError::Invalid(ValidationError::NameLength { .. }))
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn edit_renames_and_recolors() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(true);
        let id = store.add(&mut storage, new_tag("work")).unwrap().unwrap();
        store
            .edit(
                &mut storage,
                &id,
                TagPatch {
                    name: Some("office".into()),
                    color: Some(TagColor::Pink),
                },
            )
            .unwrap();
        let tag = store.get(&id).unwrap();
        assert_eq!(tag.name, "OFFICE");
        assert_eq!(tag.color, TagColor::Pink);

        // Renaming to its own name in another case is fine
        store
            .edit(
                &mut storage,
                &id,
                TagPatch {
                    name: Some("Office".into()),
                    color: None,
                },
            )
            .unwrap();
    }

    #[test]
    fn edit_rejects_collision() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(true);
        store.add(&mut storage, new_tag("work")).unwrap();
        let home = store.add(&mut storage, new_tag("home")).unwrap().unwrap();
        let err = store
            .edit(
                &mut storage,
                &home,
                TagPatch {
                    name: Some("Work".into()),
                    color: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, TagError::DuplicateName(ref n) if n == "WORK"));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(true);
        assert!(matches!(
            store.remove(&mut storage, "nope"),
            Err(TagError::NotFound(_))
        ));
        assert!(matches!(
            store.edit(&mut storage, "nope", TagPatch::default()),
            Err(TagError::NotFound(_))
        ));
    }

    #[test]
    fn remove_persists() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(true);
        let id = store.add(&mut storage, new_tag("work")).unwrap().unwrap();
        let removed = store.remove(&mut storage, &id).unwrap();
        assert_eq!(removed.name, "WORK");
        assert!(TagStore::load(&mut storage, true).unwrap().tags().is_empty());
    }

    #[test]
    fn resolve_by_id_or_name() {
        let mut storage = MemoryStorage::new();
        let mut store = TagStore::new(true);
        let id = store.add(&mut storage, new_tag("work")).unwrap().unwrap();
        assert_eq!(store.resolve(&id).unwrap().id, id);
        assert_eq!(store.resolve("Work").unwrap().id, id);
        assert!(store.resolve("home").is_none());
    }

    #[test]
    fn load_drops_malformed_tags() {
        let mut storage = MemoryStorage::new().with_entry(
            TAGS_KEY,
            r#"[{"id":"a","name":"WORK","color":"red"},
                {"id":"b","name":"X","color":"red"},
                {"id":"c","name":"HOME","color":"magenta"}]"#,
        );
        let store = TagStore::load(&mut storage, true).unwrap();
        assert_eq!(store.tags().len(), 1);
        assert_eq!(storage.recovered.len(), 2);
    }
}
