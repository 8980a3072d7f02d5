//! In-memory class and text repositories.
//!
//! Records are kept in insertion order behind a `tokio::sync::RwLock` and
//! receive UUID v4 ids when posted.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use groundtruth_core::{
    ClassRecord, ClassRepository, Error, NewClass, NewText, Result, TextRecord, TextRepository,
};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Class repository held in memory.
#[derive(Debug, Default)]
pub struct InMemoryClassRepository {
    classes: RwLock<Vec<ClassRecord>>,
}

impl InMemoryClassRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository; records without an id receive one.
    pub fn with_records(classes: Vec<ClassRecord>) -> Self {
        let classes = classes
            .into_iter()
            .map(|mut c| {
                c.id.get_or_insert_with(new_id);
                c
            })
            .collect();
        Self {
            classes: RwLock::new(classes),
        }
    }
}

#[async_trait]
impl ClassRepository for InMemoryClassRepository {
    async fn query(&self) -> Result<Vec<ClassRecord>> {
        Ok(self.classes.read().await.clone())
    }

    async fn post(&self, req: NewClass) -> Result<ClassRecord> {
        let mut classes = self.classes.write().await;
        if classes.iter().any(|c| c.label == req.label) {
            return Err(Error::DuplicateLabel(req.label));
        }
        let class = ClassRecord::new(req.label).with_id(new_id());
        debug!(subsystem = "services", label = %class.label, "Stored class");
        classes.push(class.clone());
        Ok(class)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut classes = self.classes.write().await;
        let index = classes
            .iter()
            .position(|c| c.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("class {}", id)))?;
        classes.remove(index);
        Ok(())
    }

    async fn update(&self, class: &ClassRecord) -> Result<()> {
        let id = class
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("class has no id".to_string()))?;
        let mut classes = self.classes.write().await;
        if classes
            .iter()
            .any(|c| c.label == class.label && c.id.as_deref() != Some(id))
        {
            return Err(Error::DuplicateLabel(class.label.clone()));
        }
        let stored = classes
            .iter_mut()
            .find(|c| c.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("class {}", id)))?;
        *stored = class.clone();
        Ok(())
    }
}

/// Text repository held in memory.
#[derive(Debug, Default)]
pub struct InMemoryTextRepository {
    texts: RwLock<Vec<TextRecord>>,
}

impl InMemoryTextRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository; records without an id receive one.
    pub fn with_records(texts: Vec<TextRecord>) -> Self {
        let texts = texts
            .into_iter()
            .map(|mut t| {
                t.id.get_or_insert_with(new_id);
                t
            })
            .collect();
        Self {
            texts: RwLock::new(texts),
        }
    }

    /// Stored copy of one text.
    pub async fn get(&self, id: &str) -> Option<TextRecord> {
        self.texts
            .read()
            .await
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
            .cloned()
    }
}

#[async_trait]
impl TextRepository for InMemoryTextRepository {
    async fn query(&self) -> Result<Vec<TextRecord>> {
        Ok(self.texts.read().await.clone())
    }

    async fn post(&self, req: NewText) -> Result<TextRecord> {
        let text = TextRecord::new(req.text)
            .with_classes(req.classes)
            .with_id(new_id());
        self.texts.write().await.push(text.clone());
        Ok(text)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut texts = self.texts.write().await;
        let index = texts
            .iter()
            .position(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("text {}", id)))?;
        texts.remove(index);
        Ok(())
    }

    async fn update(&self, text: &TextRecord) -> Result<()> {
        let id = text
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("text has no id".to_string()))?;
        let mut texts = self.texts.write().await;
        let stored = texts
            .iter_mut()
            .find(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("text {}", id)))?;
        *stored = text.clone();
        Ok(())
    }

    async fn add_classes(&self, id: &str, labels: &[String]) -> Result<()> {
        let mut texts = self.texts.write().await;
        let stored = texts
            .iter_mut()
            .find(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("text {}", id)))?;
        stored.classes.extend_from_slice(labels);
        Ok(())
    }

    async fn remove_classes(&self, id: &str, labels: &[String]) -> Result<()> {
        let mut texts = self.texts.write().await;
        let stored = texts
            .iter_mut()
            .find(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("text {}", id)))?;
        stored.classes.retain(|c| !labels.contains(c));
        Ok(())
    }
}
