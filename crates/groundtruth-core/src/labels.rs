//! Label-set synchronization operations.
//!
//! Pure functions that keep a text collection and a class collection
//! consistent under checking, selection, inline editing, renaming and
//! tagging. None of them fail: lookups that miss return `None` or an empty
//! result, and renaming a label nobody references leaves the texts alone.
//!
//! The flag operations are generic over the small record traits below so
//! they work on both [`ClassRecord`] and [`TextRecord`].

use tracing::{debug, trace};

use crate::models::{ClassRecord, EditOutcome, TaggingResult, TextRecord};

// =============================================================================
// RECORD TRAITS
// =============================================================================

/// A record carrying the bulk-action `checked` flag.
pub trait Checkable {
    fn is_checked(&self) -> bool;
    fn set_checked(&mut self, value: bool);
}

/// A record carrying the single-focus `selected` flag.
pub trait Selectable {
    fn is_selected(&self) -> bool;
    fn set_selected(&mut self, value: bool);
}

/// A record that can be edited inline.
pub trait Editable {
    fn is_editing(&self) -> bool;
    fn set_editing(&mut self, value: bool);
    /// Value shown in the edit field when editing ends.
    fn display_value(&self) -> &str;
}

/// A record addressed by a label.
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Checkable for ClassRecord {
    fn is_checked(&self) -> bool {
        self.checked
    }

    fn set_checked(&mut self, value: bool) {
        self.checked = value;
    }
}

impl Selectable for ClassRecord {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, value: bool) {
        self.selected = value;
    }
}

impl Editable for ClassRecord {
    fn is_editing(&self) -> bool {
        self.editing
    }

    fn set_editing(&mut self, value: bool) {
        self.editing = value;
    }

    fn display_value(&self) -> &str {
        &self.label
    }
}

impl Labeled for ClassRecord {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Checkable for TextRecord {
    fn is_checked(&self) -> bool {
        self.checked
    }

    fn set_checked(&mut self, value: bool) {
        self.checked = value;
    }
}

impl Editable for TextRecord {
    fn is_editing(&self) -> bool {
        self.editing
    }

    fn set_editing(&mut self, value: bool) {
        self.editing = value;
    }

    fn display_value(&self) -> &str {
        &self.text
    }
}

// =============================================================================
// CHECKING AND SELECTION
// =============================================================================

/// Set `checked = value` on every item.
pub fn set_checked<'a, T, I>(items: I, value: bool)
where
    T: Checkable + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    for item in items {
        item.set_checked(value);
    }
}

/// Items with `checked = true`, in their original order.
pub fn filter_checked<T: Checkable>(items: &[T]) -> Vec<&T> {
    items.iter().filter(|item| item.is_checked()).collect()
}

/// Items with `selected = true`, in their original order.
pub fn filter_selected<T: Selectable>(items: &[T]) -> Vec<&T> {
    items.iter().filter(|item| item.is_selected()).collect()
}

/// Toggle `selected` unless the item is being edited.
///
/// Returns the item's `selected` flag after the call.
pub fn select_class<T: Selectable + Editable>(item: &mut T) -> bool {
    if item.is_editing() {
        return item.is_selected();
    }
    let selected = !item.is_selected();
    item.set_selected(selected);
    selected
}

/// Clear `selected` unconditionally.
pub fn deselect<T: Selectable>(item: &mut T) {
    item.set_selected(false);
}

/// First item whose label equals `label` exactly.
pub fn find_by_label<'a, T: Labeled>(items: &'a [T], label: &str) -> Option<&'a T> {
    items.iter().find(|item| item.label() == label)
}

/// Mutable variant of [`find_by_label`].
pub fn find_by_label_mut<'a, T: Labeled>(items: &'a mut [T], label: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.label() == label)
}

// =============================================================================
// INLINE EDITING
// =============================================================================

/// Toggle edit mode: enter it when inactive, commit and leave it when active.
pub fn begin_edit<T: Editable>(item: &mut T) -> EditOutcome {
    if item.is_editing() {
        item.set_editing(false);
        EditOutcome::Committed {
            display: item.display_value().to_string(),
        }
    } else {
        item.set_editing(true);
        EditOutcome::Editing
    }
}

/// Leave edit mode, returning the stored value the field should revert to.
pub fn cancel_edit<T: Editable>(item: &mut T) -> String {
    item.set_editing(false);
    item.display_value().to_string()
}

// =============================================================================
// RENAMING AND LOOKUP
// =============================================================================

/// Rename a class and rewrite every text reference to its old label.
///
/// Each `old_label` entry in a text's class list is replaced in place, so the
/// position of the reference is kept. Returns the number of rewritten
/// references.
pub fn rename_class(
    class: &mut ClassRecord,
    texts: &mut [TextRecord],
    old_label: &str,
    new_label: &str,
) -> usize {
    class.label = new_label.to_string();

    let mut rewritten = 0;
    for text in texts.iter_mut() {
        for reference in text.classes.iter_mut().filter(|c| c.as_str() == old_label) {
            *reference = new_label.to_string();
            rewritten += 1;
        }
    }

    debug!(
        old_label,
        new_label,
        reference_count = rewritten,
        "Renamed class"
    );
    rewritten
}

/// Number of texts referencing the class's label.
pub fn count_texts_with_class(class: &ClassRecord, texts: &[TextRecord]) -> usize {
    texts
        .iter()
        .filter(|text| text.classes.contains(&class.label))
        .count()
}

/// Class records referenced by a text, in class-collection order.
pub fn classes_for_text<'a>(text: &TextRecord, classes: &'a [ClassRecord]) -> Vec<&'a ClassRecord> {
    classes
        .iter()
        .filter(|class| text.classes.contains(&class.label))
        .collect()
}

// =============================================================================
// TAGGING
// =============================================================================

/// Whether the text has at least one class.
pub fn is_tagged(text: &TextRecord) -> bool {
    !text.classes.is_empty()
}

/// Toggle `being_tagged`, returning the new value.
pub fn begin_tagging(text: &mut TextRecord) -> bool {
    text.being_tagged = !text.being_tagged;
    text.being_tagged
}

/// Append every class label to every text.
///
/// Labels are appended even when a text already carries them. Returns the
/// number of references added.
pub fn tag_texts<'t, 'c, T, C>(texts: T, classes: C) -> usize
where
    T: IntoIterator<Item = &'t mut TextRecord>,
    C: IntoIterator<Item = &'c ClassRecord>,
{
    let labels: Vec<&str> = classes.into_iter().map(|c| c.label.as_str()).collect();

    let mut added = 0;
    for text in texts {
        trace!(text = %text.text, class_count = labels.len(), "Tagging text");
        text.classes.extend(labels.iter().map(|l| l.to_string()));
        added += labels.len();
    }
    added
}

/// Tag every checked text with every checked class.
pub fn tag_checked_texts(texts: &mut [TextRecord], classes: &[ClassRecord]) -> TaggingResult {
    let checked_classes = filter_checked(classes);
    let labels: Vec<String> = checked_classes.iter().map(|c| c.label.clone()).collect();
    let text_indices: Vec<usize> = texts
        .iter()
        .enumerate()
        .filter(|(_, text)| text.checked)
        .map(|(i, _)| i)
        .collect();

    let added = tag_texts(
        texts.iter_mut().filter(|text| text.checked),
        checked_classes,
    );

    debug!(
        text_count = text_indices.len(),
        class_count = labels.len(),
        reference_count = added,
        "Tagged checked texts"
    );

    TaggingResult {
        text_indices,
        labels,
    }
}

// =============================================================================
// GENERAL
// =============================================================================

/// Predicate that is true for strings different from `target`.
///
/// ```
/// use groundtruth_core::labels::does_not_match;
///
/// let labels = ["class1", "class2", "class3"];
/// let rest: Vec<_> = labels.iter().filter(does_not_match("class1")).collect();
/// assert_eq!(rest, [&"class2", &"class3"]);
/// ```
pub fn does_not_match<S>(target: impl Into<String>) -> impl Fn(&S) -> bool
where
    S: AsRef<str> + ?Sized,
{
    let target = target.into();
    move |candidate: &S| candidate.as_ref() != target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> Vec<ClassRecord> {
        vec![
            ClassRecord {
                label: "object1".into(),
                editing: false,
                checked: false,
                selected: true,
                id: Some("0".into()),
            },
            ClassRecord {
                label: "object2".into(),
                editing: false,
                checked: true,
                selected: false,
                id: Some("1".into()),
            },
            ClassRecord {
                label: "object3".into(),
                editing: true,
                checked: false,
                selected: false,
                id: Some("2".into()),
            },
        ]
    }

    fn texts() -> Vec<TextRecord> {
        vec![
            TextRecord {
                checked: true,
                being_tagged: false,
                classes: vec!["object1".into()],
                ..Default::default()
            },
            TextRecord {
                checked: false,
                being_tagged: true,
                classes: vec!["object1".into(), "object3".into()],
                ..Default::default()
            },
            TextRecord {
                checked: false,
                being_tagged: false,
                classes: vec!["object3".into()],
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_set_checked_sets_every_item() {
        let mut classes = classes();
        assert!(!classes[0].checked);
        assert!(classes[1].checked);
        assert!(!classes[2].checked);

        set_checked(&mut classes, true);
        assert!(classes.iter().all(|c| c.checked));

        set_checked(&mut classes, false);
        assert!(classes.iter().all(|c| !c.checked));
    }

    #[test]
    fn test_check_all_then_filter_returns_everything_in_order() {
        let mut texts = texts();
        set_checked(texts.iter_mut(), true);

        let checked = filter_checked(&texts);
        assert_eq!(checked.len(), texts.len());
        for (got, expected) in checked.iter().zip(texts.iter()) {
            assert!(std::ptr::eq(*got, expected));
        }
    }

    #[test]
    fn test_filter_checked() {
        let classes = classes();
        let checked = filter_checked(&classes);

        assert_eq!(checked.len(), 1);
        assert!(std::ptr::eq(checked[0], &classes[1]));
    }

    #[test]
    fn test_filter_selected() {
        let classes = classes();
        let selected = filter_selected(&classes);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "object1");
    }

    #[test]
    fn test_select_class_ignored_while_editing() {
        let mut classes = classes();

        assert!(!select_class(&mut classes[2]));
        assert!(!classes[2].selected);

        assert!(select_class(&mut classes[1]));
        assert!(classes[1].selected);
    }

    #[test]
    fn test_select_class_toggles() {
        let mut classes = classes();

        select_class(&mut classes[0]);
        assert!(!classes[0].selected);

        select_class(&mut classes[0]);
        assert!(classes[0].selected);
    }

    #[test]
    fn test_deselect_is_unconditional() {
        let mut classes = classes();

        deselect(&mut classes[2]);
        assert!(!classes[2].selected);

        deselect(&mut classes[0]);
        assert!(!classes[0].selected);
    }

    #[test]
    fn test_find_by_label() {
        let classes = classes();

        let found = find_by_label(&classes, "object1").unwrap();
        assert!(std::ptr::eq(found, &classes[0]));

        assert!(find_by_label(&classes, "objectX").is_none());
    }

    #[test]
    fn test_begin_edit_toggles_and_restores_label() {
        let mut classes = classes();

        assert_eq!(begin_edit(&mut classes[1]), EditOutcome::Editing);
        assert!(classes[1].editing);

        assert_eq!(
            begin_edit(&mut classes[1]),
            EditOutcome::Committed {
                display: "object2".to_string()
            }
        );
        assert!(!classes[1].editing);
    }

    #[test]
    fn test_cancel_edit_returns_label() {
        let mut classes = classes();

        let display = cancel_edit(&mut classes[2]);
        assert!(!classes[2].editing);
        assert_eq!(display, "object3");
    }

    #[test]
    fn test_rename_class_propagates_to_texts() {
        let mut classes = classes();
        let mut texts = texts();

        let rewritten = rename_class(&mut classes[0], &mut texts, "object1", "object2");

        assert_eq!(rewritten, 2);
        assert_eq!(classes[0].label, "object2");
        assert_eq!(texts[0].classes, vec!["object2"]);
        assert_eq!(texts[1].classes, vec!["object2", "object3"]);
        assert_eq!(texts[2].classes, vec!["object3"]);
    }

    #[test]
    fn test_rename_class_round_trip_restores_state() {
        let mut classes = classes();
        let mut texts = texts();
        let original_texts = texts.clone();

        rename_class(&mut classes[0], &mut texts, "object1", "renamed");
        rename_class(&mut classes[0], &mut texts, "renamed", "object1");

        assert_eq!(classes[0].label, "object1");
        assert_eq!(texts, original_texts);
    }

    #[test]
    fn test_rename_unknown_label_leaves_texts_alone() {
        let mut class = ClassRecord::new("ghost");
        let mut texts = texts();
        let original_texts = texts.clone();

        assert_eq!(rename_class(&mut class, &mut texts, "ghost", "spirit"), 0);
        assert_eq!(texts, original_texts);
        assert_eq!(class.label, "spirit");
    }

    #[test]
    fn test_count_texts_with_class() {
        let texts = texts();

        assert_eq!(count_texts_with_class(&ClassRecord::new("object1"), &texts), 2);
        assert_eq!(count_texts_with_class(&ClassRecord::new("object3"), &texts), 2);
        assert_eq!(count_texts_with_class(&ClassRecord::new("object2"), &texts), 0);
        assert_eq!(count_texts_with_class(&ClassRecord::new("object1"), &[]), 0);
    }

    #[test]
    fn test_classes_for_text() {
        let classes = classes();
        let texts = texts();

        let found = classes_for_text(&texts[0], &classes);
        assert_eq!(found, vec![&classes[0]]);
    }

    #[test]
    fn test_classes_for_text_follows_collection_order() {
        let classes = classes();
        let text = TextRecord::new("t").with_classes(["object3", "object1"]);

        let labels: Vec<&str> = classes_for_text(&text, &classes)
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["object1", "object3"]);
    }

    #[test]
    fn test_is_tagged() {
        assert!(!is_tagged(&TextRecord::default()));
        assert!(is_tagged(
            &TextRecord::default().with_classes(["class1", "class2"])
        ));
    }

    #[test]
    fn test_begin_tagging_toggles() {
        let mut texts = texts();

        assert!(!begin_tagging(&mut texts[1]));
        assert!(!texts[1].being_tagged);

        assert!(begin_tagging(&mut texts[0]));
        assert!(texts[0].being_tagged);
    }

    #[test]
    fn test_tag_texts_appends_to_every_text() {
        let mut texts = texts();
        let new_class = ClassRecord::new("newClass");

        let added = tag_texts(texts.iter_mut(), [&new_class]);

        assert_eq!(added, 3);
        for text in &texts {
            assert_eq!(text.classes.last().map(String::as_str), Some("newClass"));
        }
    }

    #[test]
    fn test_tag_texts_does_not_dedup() {
        let mut texts = vec![TextRecord::new("t").with_classes(["a"])];
        let class = ClassRecord::new("a");

        tag_texts(texts.iter_mut(), [&class]);
        assert_eq!(texts[0].classes, vec!["a", "a"]);
    }

    #[test]
    fn test_tag_checked_texts() {
        let mut texts = texts();
        let classes = classes();

        assert_eq!(texts[0].classes.len(), 1);
        let result = tag_checked_texts(&mut texts, &classes);

        assert_eq!(texts[0].classes, vec!["object1", "object2"]);
        assert_eq!(texts[1].classes.len(), 2);
        assert_eq!(result.text_indices, vec![0]);
        assert_eq!(result.labels, vec!["object2"]);
    }

    #[test]
    fn test_tag_checked_texts_with_nothing_checked() {
        let mut texts = texts();
        set_checked(&mut texts, false);

        let result = tag_checked_texts(&mut texts, &classes());
        assert!(result.is_empty());
        assert_eq!(texts[0].classes, vec!["object1"]);
    }

    #[test]
    fn test_does_not_match() {
        let array = ["class1", "class2", "class3"];
        let filtered: Vec<&&str> = array.iter().filter(does_not_match("class1")).collect();

        assert_eq!(filtered.len(), 2);
        assert_eq!(*filtered[0], array[1]);
        assert_eq!(*filtered[1], array[2]);
    }

    #[test]
    fn test_does_not_match_with_retain() {
        let mut labels = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        labels.retain(does_not_match("a"));
        assert_eq!(labels, vec!["b"]);
    }
}
