//! Core data models for groundtruth.
//!
//! These types are shared across all groundtruth crates. Records carry the
//! per-item UI flags (`checked`, `selected`, `editing`, `being_tagged`) next
//! to their content so the label-set operations can work on them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// =============================================================================
// CLASS TYPES
// =============================================================================

/// A class (label category) that texts can be tagged with.
///
/// `label` is the unique key within a class collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassRecord {
    pub label: String,
    #[serde(default, alias = "edit")]
    pub editing: bool,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub selected: bool,
    /// Repository id, assigned when the class is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ClassRecord {
    /// Create an unpersisted class with all flags cleared.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Attach a repository id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Request for creating a class in a [`crate::ClassRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub label: String,
}

// =============================================================================
// TEXT TYPES
// =============================================================================

/// A unit of content tagged with zero or more classes.
///
/// `classes` holds class labels, in the order they were tagged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, rename = "beingTagged", alias = "being_tagged")]
    pub being_tagged: bool,
    #[serde(default, alias = "edit")]
    pub editing: bool,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl TextRecord {
    /// Create an untagged, unpersisted text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the initial class references.
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a repository id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Request for creating a text in a [`crate::TextRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewText {
    pub text: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

// =============================================================================
// COLLECTION ADDRESSING
// =============================================================================

/// Which of the two collections an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Text,
    Class,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Class => write!(f, "class"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "texts" => Ok(Self::Text),
            "class" | "classes" => Ok(Self::Class),
            _ => Err(Error::InvalidInput(format!("Invalid item kind: {}", s))),
        }
    }
}

// =============================================================================
// IMPORT / EXPORT
// =============================================================================

/// A text and its labels as carried by a training file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledText {
    pub text: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

/// Resolved value of a training-file upload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportedData {
    #[serde(default)]
    pub classes: Vec<String>,
    /// Texts found in the file. Accepts the upload service's `text` key.
    #[serde(default, alias = "text")]
    pub texts: Vec<LabeledText>,
}

/// Exportable snapshot of the text collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainingSet {
    pub texts: Vec<LabeledText>,
}

impl TrainingSet {
    /// Texts with at least one class.
    pub fn tagged(&self) -> impl Iterator<Item = &LabeledText> {
        self.texts.iter().filter(|t| !t.classes.is_empty())
    }
}

/// State of a classifier after a training request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierStatus {
    pub classifier_id: String,
    pub name: String,
    pub language: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// OPERATION OUTCOMES
// =============================================================================

/// Result of toggling inline edit mode on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Edit mode was entered.
    Editing,
    /// Edit mode was left; `display` is the value the field should show.
    Committed { display: String },
}

/// What a bulk tagging pass did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaggingResult {
    /// Positions of the tagged texts in the text collection.
    pub text_indices: Vec<usize>,
    /// Labels appended to each of those texts.
    pub labels: Vec<String>,
}

impl TaggingResult {
    pub fn is_empty(&self) -> bool {
        self.text_indices.is_empty() || self.labels.is_empty()
    }
}

/// What merging an upload into the collections added.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportResult {
    /// Labels of classes that did not exist before the import.
    pub added_classes: Vec<String>,
    /// Positions of the appended texts in the text collection.
    pub added_texts: std::ops::Range<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_record_accepts_edit_alias() {
        let json = r#"{"label":"object3","edit":true,"checked":false,"selected":false,"id":"2"}"#;
        let class: ClassRecord = serde_json::from_str(json).unwrap();
        assert!(class.editing);
        assert_eq!(class.id.as_deref(), Some("2"));
    }

    #[test]
    fn test_text_record_being_tagged_field_name() {
        let json = r#"{"checked":true,"beingTagged":true,"classes":["object1"]}"#;
        let text: TextRecord = serde_json::from_str(json).unwrap();
        assert!(text.being_tagged);
        assert_eq!(text.classes, vec!["object1"]);

        let back = serde_json::to_value(&text).unwrap();
        assert_eq!(back["beingTagged"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_imported_data_accepts_text_key() {
        let json = r#"{"classes":["class"],"text":[{"text":"text","classes":["class"]}]}"#;
        let data: ImportedData = serde_json::from_str(json).unwrap();
        assert_eq!(data.classes, vec!["class"]);
        assert_eq!(data.texts.len(), 1);
        assert_eq!(data.texts[0].text, "text");
    }

    #[test]
    fn test_item_kind_from_str() {
        assert_eq!("text".parse::<ItemKind>().unwrap(), ItemKind::Text);
        assert_eq!("Class".parse::<ItemKind>().unwrap(), ItemKind::Class);
        assert!("label".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_training_set_tagged_skips_untagged() {
        let set = TrainingSet {
            texts: vec![
                LabeledText {
                    text: "a".into(),
                    classes: vec!["x".into()],
                },
                LabeledText {
                    text: "b".into(),
                    classes: vec![],
                },
            ],
        };
        assert_eq!(set.tagged().count(), 1);
    }
}
