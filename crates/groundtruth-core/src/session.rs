//! Training session: label-set state wired to the service capabilities.
//!
//! A [`TrainingSession`] owns a [`LabelSetManager`] and keeps the class and
//! text repositories in step with it. Creations, imports and deletions hit
//! the repository before the local state changes; tagging and renaming change
//! the local state first and are persisted afterwards. Every service error
//! is returned to the caller.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::labels::{filter_checked, find_by_label_mut};
use crate::manager::LabelSetManager;
use crate::models::*;
use crate::traits::{ClassRepository, TextRepository, TrainingService};

/// One user's labeling session.
pub struct TrainingSession {
    nlc: Arc<dyn TrainingService>,
    class_repo: Arc<dyn ClassRepository>,
    text_repo: Arc<dyn TextRepository>,
    state: LabelSetManager,
}

impl TrainingSession {
    pub fn new(
        nlc: Arc<dyn TrainingService>,
        class_repo: Arc<dyn ClassRepository>,
        text_repo: Arc<dyn TextRepository>,
    ) -> Self {
        Self {
            nlc,
            class_repo,
            text_repo,
            state: LabelSetManager::new(),
        }
    }

    pub fn state(&self) -> &LabelSetManager {
        &self.state
    }

    /// Direct access for flag changes that need no persistence
    /// (checking, selection, inline edit mode).
    pub fn state_mut(&mut self) -> &mut LabelSetManager {
        &mut self.state
    }

    /// Replace the local state with the repositories' contents.
    #[instrument(skip(self), fields(subsystem = "core", op = "load"))]
    pub async fn load(&mut self) -> Result<()> {
        let classes = self.class_repo.query().await?;
        let texts = self.text_repo.query().await?;
        info!(
            class_count = classes.len(),
            text_count = texts.len(),
            "Loaded label set"
        );
        self.state.replace(classes, texts);
        Ok(())
    }

    /// Create and persist a class.
    #[instrument(skip(self), fields(subsystem = "core", op = "create_class"))]
    pub async fn create_class(&mut self, label: &str) -> Result<&ClassRecord> {
        if label.trim().is_empty() {
            return Err(Error::InvalidInput("Class label cannot be empty".to_string()));
        }
        if self.state.find_class(label).is_some() {
            return Err(Error::DuplicateLabel(label.to_string()));
        }

        let created = self
            .class_repo
            .post(NewClass {
                label: label.to_string(),
            })
            .await?;
        self.state.insert_class(created)
    }

    /// Create and persist an untagged text.
    #[instrument(skip(self, text), fields(subsystem = "core", op = "create_text"))]
    pub async fn create_text(&mut self, text: &str) -> Result<&TextRecord> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("Text cannot be empty".to_string()));
        }
        let created = self
            .text_repo
            .post(NewText {
                text: text.to_string(),
                classes: Vec::new(),
            })
            .await?;
        self.state.insert_text(created)
    }

    /// Rename a class locally, then persist the class and every text whose
    /// references changed.
    #[instrument(skip(self), fields(subsystem = "core", op = "rename_class"))]
    pub async fn rename_class(&mut self, old_label: &str, new_label: &str) -> Result<bool> {
        let affected: Vec<usize> = self
            .state
            .texts()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.classes.iter().any(|c| c == old_label))
            .map(|(i, _)| i)
            .collect();

        if !self.state.rename_class(old_label, new_label)? {
            return Ok(false);
        }

        if let Some(class) = self.state.find_class(new_label) {
            if class.id.is_some() {
                self.class_repo.update(class).await.map_err(|e| {
                    warn!(error = %e, label = new_label, "Failed to persist renamed class");
                    e
                })?;
            }
        }
        for index in affected {
            let text = &self.state.texts()[index];
            if text.id.is_some() {
                self.text_repo.update(text).await?;
            }
        }
        debug!(old_label, new_label, "Rename persisted");
        Ok(true)
    }

    /// Delete every checked class from the repository and the local state,
    /// untagging the stored texts that referenced them.
    ///
    /// Each class leaves the local state as soon as its removal succeeds, so
    /// a failed call can be retried for whatever is still checked.
    #[instrument(skip(self), fields(subsystem = "core", op = "delete_checked_classes"))]
    pub async fn delete_checked_classes(&mut self) -> Result<Vec<ClassRecord>> {
        let checked: Vec<ClassRecord> = filter_checked(self.state.classes())
            .into_iter()
            .cloned()
            .collect();

        let mut removed = Vec::with_capacity(checked.len());
        for class in checked {
            let labels = vec![class.label.clone()];
            for text in self.state.texts() {
                if let Some(id) = &text.id {
                    if text.classes.contains(&class.label) {
                        self.text_repo.remove_classes(id, &labels).await?;
                    }
                }
            }
            if let Some(id) = &class.id {
                self.class_repo.remove(id).await.map_err(|e| {
                    warn!(error = %e, label = %class.label, "Failed to remove class");
                    e
                })?;
            }
            removed.extend(self.state.delete_classes(&labels));
        }

        Ok(removed)
    }

    /// Delete every checked text from the repository and the local state.
    ///
    /// Each text leaves the local state as soon as its removal succeeds.
    #[instrument(skip(self), fields(subsystem = "core", op = "delete_checked_texts"))]
    pub async fn delete_checked_texts(&mut self) -> Result<Vec<TextRecord>> {
        let mut removed = Vec::new();
        while let Some(index) = self.state.texts().iter().position(|t| t.checked) {
            if let Some(id) = &self.state.texts()[index].id {
                self.text_repo.remove(id).await.map_err(|e| {
                    warn!(error = %e, record_id = %id, "Failed to remove text");
                    e
                })?;
            }
            removed.extend(self.state.delete_texts(&[index]));
        }
        Ok(removed)
    }

    /// Tag every checked text with every checked class and persist the new
    /// references.
    #[instrument(skip(self), fields(subsystem = "core", op = "tag_checked_texts"))]
    pub async fn tag_checked_texts(&mut self) -> Result<TaggingResult> {
        let result = self.state.tag_checked_texts();
        if result.is_empty() {
            return Ok(result);
        }

        for &index in &result.text_indices {
            if let Some(id) = &self.state.texts()[index].id {
                self.text_repo
                    .add_classes(id, &result.labels)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, record_id = %id, "Failed to persist tags");
                        e
                    })?;
            }
        }
        Ok(result)
    }

    /// Remove one label from one text and persist the change.
    #[instrument(skip(self), fields(subsystem = "core", op = "untag_text"))]
    pub async fn untag_text(&mut self, index: usize, label: &str) -> Result<bool> {
        if !self.state.untag_text(index, label) {
            return Ok(false);
        }
        if let Some(id) = &self.state.texts()[index].id {
            self.text_repo
                .remove_classes(id, &[label.to_string()])
                .await?;
        }
        Ok(true)
    }

    /// Upload a training file, persist what it adds and merge it into the
    /// state.
    ///
    /// The merge is staged on a copy of the state and only installed once
    /// every new record is stored. On failure the records stored so far are
    /// removed again and the state is left untouched.
    #[instrument(skip(self, content), fields(subsystem = "core", op = "import_file", content_len = content.len()))]
    pub async fn import_file(&mut self, content: &str) -> Result<ImportResult> {
        let data = self.nlc.upload(content).await?;
        let mut staged = self.state.clone();
        let result = staged.import(data);

        let mut posted = Posted::default();
        if let Err(e) = self.persist_import(&mut staged, &result, &mut posted).await {
            warn!(error = %e, "Import failed, rolling back stored records");
            self.discard(posted).await;
            return Err(e);
        }
        self.state = staged;

        info!(
            class_count = result.added_classes.len(),
            text_count = result.added_texts.len(),
            "Training file imported"
        );
        Ok(result)
    }

    async fn persist_import(
        &self,
        staged: &mut LabelSetManager,
        result: &ImportResult,
        posted: &mut Posted,
    ) -> Result<()> {
        for label in &result.added_classes {
            let created = self
                .class_repo
                .post(NewClass {
                    label: label.clone(),
                })
                .await?;
            posted.classes.extend(created.id.clone());
            if let Some(class) = find_by_label_mut(staged.classes_mut(), label) {
                class.id = created.id;
            }
        }

        for index in result.added_texts.clone() {
            let text = &staged.texts()[index];
            let created = self
                .text_repo
                .post(NewText {
                    text: text.text.clone(),
                    classes: text.classes.clone(),
                })
                .await?;
            posted.texts.extend(created.id.clone());
            staged.texts_mut()[index].id = created.id;
        }
        Ok(())
    }

    /// Best-effort removal of records stored by a failed import.
    async fn discard(&self, posted: Posted) {
        for id in &posted.texts {
            if let Err(e) = self.text_repo.remove(id).await {
                warn!(error = %e, record_id = %id, "Failed to discard imported text");
            }
        }
        for id in &posted.classes {
            if let Err(e) = self.class_repo.remove(id).await {
                warn!(error = %e, record_id = %id, "Failed to discard imported class");
            }
        }
    }

    /// Render the current texts as a training file.
    #[instrument(skip(self), fields(subsystem = "core", op = "export_to_file"))]
    pub async fn export_to_file(&self) -> Result<String> {
        let content = self.nlc.download(&self.state.export()).await?;
        info!(content_len = content.len(), "Training file exported");
        Ok(content)
    }

    /// Train a classifier on the current texts.
    #[instrument(skip(self), fields(subsystem = "core", op = "train"))]
    pub async fn train(&self) -> Result<ClassifierStatus> {
        let status = self.nlc.train(&self.state.export()).await?;
        info!(
            classifier_id = %status.classifier_id,
            status = %status.status,
            "Training requested"
        );
        Ok(status)
    }
}

/// Ids stored so far by an import in progress.
#[derive(Debug, Default)]
struct Posted {
    classes: Vec<String>,
    texts: Vec<String>,
}
