use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name shown for "no tag"; never a valid tag name when names are uppercased
pub const RESERVED_TAG_NAME: &str = "NONE";

/// Tag names are 2..=24 characters
pub const TAG_NAME_MIN: usize = 2;
pub const TAG_NAME_MAX: usize = 24;

/// The fixed tag palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    Cyan,
    Purple,
    Pink,
    Gray,
}

impl TagColor {
    pub const ALL: [TagColor; 10] = [
        TagColor::Red,
        TagColor::Orange,
        TagColor::Yellow,
        TagColor::Green,
        TagColor::Teal,
        TagColor::Blue,
        TagColor::Cyan,
        TagColor::Purple,
        TagColor::Pink,
        TagColor::Gray,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TagColor::Red => "red",
            TagColor::Orange => "orange",
            TagColor::Yellow => "yellow",
            TagColor::Green => "green",
            TagColor::Teal => "teal",
            TagColor::Blue => "blue",
            TagColor::Cyan => "cyan",
            TagColor::Purple => "purple",
            TagColor::Pink => "pink",
            TagColor::Gray => "gray",
        }
    }

    /// Pick a palette color at random (default for new tags)
    pub fn random() -> TagColor {
        *TagColor::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&TagColor::Gray)
    }

    /// Next color in palette order, wrapping around
    pub fn next(self) -> TagColor {
        let idx = TagColor::ALL.iter().position(|c| *c == self).unwrap_or(0);
        TagColor::ALL[(idx + 1) % TagColor::ALL.len()]
    }

    pub fn prev(self) -> TagColor {
        let len = TagColor::ALL.len();
        let idx = TagColor::ALL.iter().position(|c| *c == self).unwrap_or(0);
        TagColor::ALL[(idx + len - 1) % len]
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        TagColor::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower || (lower == "grey" && *c == TagColor::Gray))
            .ok_or_else(|| {
                format!(
                    "unknown color \"{}\" (expected one of: {})",
                    s,
                    TagColor::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

/// A named, colored label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: TagColor,
}

/// Fields supplied by the tag form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: TagColor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<TagColor>,
}

impl Tag {
    pub fn new(data: NewTag) -> Self {
        Tag {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            color: data.color,
        }
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parse_and_display() {
        assert_eq!("Teal".parse::<TagColor>(), Ok(TagColor::Teal));
        assert_eq!("grey".parse::<TagColor>(), Ok(TagColor::Gray));
        assert!("magenta".parse::<TagColor>().is_err());
        assert_eq!(TagColor::Purple.to_string(), "purple");
    }

    #[test]
    fn color_serde_is_lowercase() {
        let tag = Tag {
            id: "x".into(),
            name: "WORK".into(),
            color: TagColor::Blue,
        };
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, r#"{"id":"x","name":"WORK","color":"blue"}"#);
    }

    #[test]
    fn color_next_wraps() {
        assert_eq!(TagColor::Red.next(), TagColor::Orange);
        assert_eq!(TagColor::Gray.next(), TagColor::Red);
        assert_eq!(TagColor::Red.prev(), TagColor::Gray);
    }

    #[test]
    fn random_color_is_in_palette() {
        for _ in 0..20 {
            assert!(TagColor::ALL.contains(&TagColor::random()));
        }
    }

    #[test]
    fn has_name_ignores_case() {
        let tag = Tag::new(NewTag {
            name: "Work".into(),
            color: TagColor::Red,
        });
        assert!(tag.has_name("WORK"));
        assert!(tag.has_name(" work "));
        assert!(!tag.has_name("home"));
    }
}
