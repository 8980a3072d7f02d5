//! Owned label-set state.
//!
//! [`LabelSetManager`] owns the class and text collections of one labeling
//! session and applies the operations in [`crate::labels`] to them, locating
//! classes by label and texts by position.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::defaults::ESCAPE_KEY_CODE;
use crate::error::{Error, Result};
use crate::labels::{self, does_not_match, find_by_label, find_by_label_mut};
use crate::models::*;

/// Classes and texts of one labeling session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSetManager {
    classes: Vec<ClassRecord>,
    texts: Vec<TextRecord>,
}

impl LabelSetManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager over existing collections.
    ///
    /// At most one class stays selected: the first selected one wins.
    pub fn with_records(classes: Vec<ClassRecord>, texts: Vec<TextRecord>) -> Self {
        let mut manager = Self { classes, texts };
        manager.keep_single_selection();
        manager
    }

    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    pub fn texts(&self) -> &[TextRecord] {
        &self.texts
    }

    /// Raw access to the classes. Callers that change `selected` here own
    /// the single-selection invariant; prefer [`Self::select_class`].
    pub fn classes_mut(&mut self) -> &mut [ClassRecord] {
        &mut self.classes
    }

    pub fn texts_mut(&mut self) -> &mut [TextRecord] {
        &mut self.texts
    }

    /// Replace both collections, e.g. after loading from repositories.
    ///
    /// At most one class stays selected: the first selected one wins.
    pub fn replace(&mut self, classes: Vec<ClassRecord>, texts: Vec<TextRecord>) {
        self.classes = classes;
        self.texts = texts;
        self.keep_single_selection();
    }

    fn keep_single_selection(&mut self) {
        let mut seen = false;
        for class in self.classes.iter_mut().filter(|c| c.selected) {
            if seen {
                labels::deselect(class);
            }
            seen = true;
        }
    }

    /// Number of records in the addressed collection.
    pub fn len(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Text => self.texts.len(),
            ItemKind::Class => self.classes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.texts.is_empty()
    }

    pub fn find_class(&self, label: &str) -> Option<&ClassRecord> {
        find_by_label(&self.classes, label)
    }

    // =========================================================================
    // CHECKING AND SELECTION
    // =========================================================================

    /// Set `checked` on every record of one collection.
    pub fn check_all(&mut self, kind: ItemKind, value: bool) {
        match kind {
            ItemKind::Text => labels::set_checked(&mut self.texts, value),
            ItemKind::Class => labels::set_checked(&mut self.classes, value),
        }
    }

    /// Number of checked records in one collection.
    pub fn checked_count(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Text => labels::filter_checked(&self.texts).len(),
            ItemKind::Class => labels::filter_checked(&self.classes).len(),
        }
    }

    /// Set `checked` on one class. Returns `false` when no class has the label.
    pub fn check_class(&mut self, label: &str, value: bool) -> bool {
        match find_by_label_mut(&mut self.classes, label) {
            Some(class) => {
                class.checked = value;
                true
            }
            None => false,
        }
    }

    /// Set `checked` on one text. Returns `false` when the index is out of range.
    pub fn check_text(&mut self, index: usize, value: bool) -> bool {
        match self.texts.get_mut(index) {
            Some(text) => {
                text.checked = value;
                true
            }
            None => false,
        }
    }

    /// The selected class, if any.
    pub fn selected_class(&self) -> Option<&ClassRecord> {
        labels::filter_selected(&self.classes).into_iter().next()
    }

    /// Toggle selection of a class.
    ///
    /// Selecting a class deselects every other one. A class in edit mode is
    /// left as it is. Returns the class's `selected` flag after the call, or
    /// `None` when no class has the label.
    pub fn select_class(&mut self, label: &str) -> Option<bool> {
        let index = self.classes.iter().position(|c| c.label == label)?;
        let selected = labels::select_class(&mut self.classes[index]);
        if selected {
            for (i, other) in self.classes.iter_mut().enumerate() {
                if i != index {
                    labels::deselect(other);
                }
            }
        }
        Some(selected)
    }

    /// Deselect a class. Returns `false` when no class has the label.
    pub fn deselect_class(&mut self, label: &str) -> bool {
        match find_by_label_mut(&mut self.classes, label) {
            Some(class) => {
                labels::deselect(class);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // INLINE EDITING
    // =========================================================================

    /// Toggle edit mode on a class.
    pub fn toggle_edit(&mut self, label: &str) -> Option<EditOutcome> {
        find_by_label_mut(&mut self.classes, label).map(labels::begin_edit)
    }

    /// Leave edit mode on a class, returning the label to display.
    pub fn cancel_edit(&mut self, label: &str) -> Option<String> {
        find_by_label_mut(&mut self.classes, label).map(labels::cancel_edit)
    }

    /// Cancel editing when the released key is Escape; other keys are ignored.
    pub fn key_up_cancel_editing(&mut self, label: &str, key_code: u32) -> Option<String> {
        if key_code != ESCAPE_KEY_CODE {
            return None;
        }
        self.cancel_edit(label)
    }

    // =========================================================================
    // RENAMING AND LOOKUP
    // =========================================================================

    /// Rename a class and every text reference to it.
    ///
    /// Returns `Ok(false)` when no class has `old_label`.
    pub fn rename_class(&mut self, old_label: &str, new_label: &str) -> Result<bool> {
        if new_label.trim().is_empty() {
            return Err(Error::InvalidInput("Class label cannot be empty".to_string()));
        }
        if old_label != new_label && self.find_class(new_label).is_some() {
            return Err(Error::DuplicateLabel(new_label.to_string()));
        }

        let Self { classes, texts } = self;
        match find_by_label_mut(classes, old_label) {
            Some(class) => {
                labels::rename_class(class, texts, old_label, new_label);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of texts tagged with the label.
    pub fn count_texts_with_class(&self, label: &str) -> usize {
        match self.find_class(label) {
            Some(class) => labels::count_texts_with_class(class, &self.texts),
            None => 0,
        }
    }

    /// Classes referenced by the text at `index`, in class-collection order.
    pub fn classes_for_text(&self, index: usize) -> Vec<&ClassRecord> {
        match self.texts.get(index) {
            Some(text) => labels::classes_for_text(text, &self.classes),
            None => Vec::new(),
        }
    }

    // =========================================================================
    // ADDING AND DELETING
    // =========================================================================

    /// Append a new class.
    pub fn add_class(&mut self, label: &str) -> Result<&ClassRecord> {
        self.insert_class(ClassRecord::new(label))
    }

    /// Append a class record, e.g. one returned by a repository.
    pub fn insert_class(&mut self, class: ClassRecord) -> Result<&ClassRecord> {
        if class.label.trim().is_empty() {
            return Err(Error::InvalidInput("Class label cannot be empty".to_string()));
        }
        if self.find_class(&class.label).is_some() {
            return Err(Error::DuplicateLabel(class.label));
        }
        debug!(label = %class.label, "Adding class");
        self.classes.push(class);
        Ok(&self.classes[self.classes.len() - 1])
    }

    /// Append a new untagged text.
    pub fn add_text(&mut self, text: &str) -> Result<&TextRecord> {
        self.insert_text(TextRecord::new(text))
    }

    /// Append a text record, e.g. one returned by a repository.
    pub fn insert_text(&mut self, text: TextRecord) -> Result<&TextRecord> {
        if text.text.trim().is_empty() {
            return Err(Error::InvalidInput("Text cannot be empty".to_string()));
        }
        self.texts.push(text);
        Ok(&self.texts[self.texts.len() - 1])
    }

    /// Remove classes by label and strip their labels from every text.
    ///
    /// Returns the removed records in collection order.
    pub fn delete_classes(&mut self, labels: &[String]) -> Vec<ClassRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.classes)
            .into_iter()
            .partition(|c| labels.contains(&c.label));
        self.classes = kept;

        for class in &removed {
            for text in self.texts.iter_mut() {
                text.classes.retain(does_not_match(class.label.as_str()));
            }
        }

        debug!(class_count = removed.len(), "Deleted classes");
        removed
    }

    /// Remove every checked class.
    pub fn delete_checked_classes(&mut self) -> Vec<ClassRecord> {
        let checked: Vec<String> = labels::filter_checked(&self.classes)
            .into_iter()
            .map(|c| c.label.clone())
            .collect();
        self.delete_classes(&checked)
    }

    /// Remove texts by position. Out-of-range and repeated indices are ignored.
    pub fn delete_texts(&mut self, indices: &[usize]) -> Vec<TextRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.texts)
            .into_iter()
            .enumerate()
            .partition(|(i, _)| indices.contains(i));
        self.texts = kept.into_iter().map(|(_, t)| t).collect();

        debug!(text_count = removed.len(), "Deleted texts");
        removed.into_iter().map(|(_, t)| t).collect()
    }

    /// Remove every checked text.
    pub fn delete_checked_texts(&mut self) -> Vec<TextRecord> {
        let checked: Vec<usize> = self
            .texts
            .iter()
            .enumerate()
            .filter(|(_, t)| t.checked)
            .map(|(i, _)| i)
            .collect();
        self.delete_texts(&checked)
    }

    // =========================================================================
    // TAGGING
    // =========================================================================

    /// Toggle `being_tagged` on the text at `index`.
    pub fn begin_tagging(&mut self, index: usize) -> Option<bool> {
        self.texts.get_mut(index).map(labels::begin_tagging)
    }

    /// Tag every checked text with every checked class.
    pub fn tag_checked_texts(&mut self) -> TaggingResult {
        labels::tag_checked_texts(&mut self.texts, &self.classes)
    }

    /// Remove a label from one text. Returns whether anything was removed.
    pub fn untag_text(&mut self, index: usize, label: &str) -> bool {
        match self.texts.get_mut(index) {
            Some(text) => {
                let before = text.classes.len();
                text.classes.retain(does_not_match(label));
                text.classes.len() != before
            }
            None => false,
        }
    }

    // =========================================================================
    // IMPORT / EXPORT
    // =========================================================================

    /// Merge uploaded classes and texts into the collections.
    ///
    /// Classes are matched by label and existing ones are kept as they are.
    /// Labels used by an imported text but missing from the class list are
    /// added as classes too, so every reference resolves. Blank labels are
    /// dropped everywhere. Texts are appended.
    pub fn import(&mut self, mut data: ImportedData) -> ImportResult {
        for text in data.texts.iter_mut() {
            text.classes.retain(|c| !c.trim().is_empty());
        }

        let mut added_classes = Vec::new();
        let referenced = data.texts.iter().flat_map(|t| t.classes.iter());
        for label in data.classes.iter().chain(referenced) {
            if label.trim().is_empty() || self.find_class(label).is_some() {
                continue;
            }
            self.classes.push(ClassRecord::new(label.as_str()));
            added_classes.push(label.clone());
        }

        let start = self.texts.len();
        self.texts.extend(
            data.texts
                .into_iter()
                .filter(|t| !t.text.trim().is_empty())
                .map(|t| TextRecord::new(t.text).with_classes(t.classes)),
        );
        let added_texts = start..self.texts.len();

        info!(
            class_count = added_classes.len(),
            text_count = added_texts.len(),
            "Imported training data"
        );
        ImportResult {
            added_classes,
            added_texts,
        }
    }

    /// Snapshot of the texts and their labels.
    pub fn export(&self) -> TrainingSet {
        TrainingSet {
            texts: self
                .texts
                .iter()
                .map(|t| LabeledText {
                    text: t.text.clone(),
                    classes: t.classes.clone(),
                })
                .collect(),
        }
    }
}
