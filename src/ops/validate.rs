use crate::model::tag::{RESERVED_TAG_NAME, TAG_NAME_MAX, TAG_NAME_MIN};
use crate::model::task::{NewTask, TaskPatch};

/// A form field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,
    #[error("tag name must be {min} to {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("\"{0}\" is reserved for untagged tasks")]
    ReservedName(String),
}

/// Trim and check the add-form fields
pub fn validate_new_task(data: NewTask) -> Result<NewTask, ValidationError> {
    let title = validate_title(&data.title)?;
    Ok(NewTask {
        title,
        description: data.description.trim().to_string(),
        tag: data.tag,
    })
}

/// Trim and check the fields an edit touches
pub fn validate_patch(patch: TaskPatch) -> Result<TaskPatch, ValidationError> {
    let title = patch.title.as_deref().map(validate_title).transpose()?;
    Ok(TaskPatch {
        title,
        description: patch.description.map(|d| d.trim().to_string()),
        ..patch
    })
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Trim a tag name, uppercase it if requested, and check length and the
/// reserved name. Length is counted in chars after trimming.
pub fn normalize_tag_name(name: &str, uppercase: bool) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(TAG_NAME_MIN..=TAG_NAME_MAX).contains(&len) {
        return Err(ValidationError::NameLength {
            min: TAG_NAME_MIN,
            max: TAG_NAME_MAX,
        });
    }
    if !uppercase {
        return Ok(trimmed.to_string());
    }
    let upper = trimmed.to_uppercase();
    if upper == RESERVED_TAG_NAME {
        return Err(ValidationError::ReservedName(upper));
    }
    Ok(upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(
            validate_new_task(NewTask::titled("   ")),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            validate_patch(TaskPatch {
                title: Some(String::new()),
                ..Default::default()
            }),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn fields_are_trimmed() {
        let data = validate_new_task(NewTask {
            title: "  Buy milk ".into(),
            description: " 2 liters\n".into(),
            tag: None,
        })
        .unwrap();
        assert_eq!(data.title, "Buy milk");
        assert_eq!(data.description, "2 liters");
    }

    #[test]
    fn patch_without_title_passes() {
        let patch = validate_patch(TaskPatch {
            is_completed: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.is_completed, Some(true));
    }

    #[test]
    fn tag_name_length_bounds() {
        assert!(normalize_tag_name("a", false).is_err());
        assert_eq!(normalize_tag_name("ab", false).unwrap(), "ab");
        assert!(normalize_tag_name(&"x".repeat(24), false).is_ok());
        assert!(normalize_tag_name(&"x".repeat(25), false).is_err());
        // Counted after trimming
        assert!(normalize_tag_name("  a  ", false).is_err());
        // Chars, not bytes
        assert!(normalize_tag_name(&"é".repeat(24), false).is_ok());
    }

    #[test]
    fn uppercase_variant_reserves_none() {
        assert_eq!(normalize_tag_name("Work", true).unwrap(), "WORK");
        assert_eq!(
            normalize_tag_name("none", true),
            Err(ValidationError::ReservedName("NONE".into()))
        );
        // Without uppercasing, "none" is an ordinary name
        assert_eq!(normalize_tag_name("none", false).unwrap(), "none");
    }
}
