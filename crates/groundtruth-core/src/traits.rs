//! Service capabilities consumed by the training session.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// TRAINING SERVICE
// =============================================================================

/// Classifier training and training-file exchange.
#[async_trait]
pub trait TrainingService: Send + Sync {
    /// Submit a training set and return the new classifier's status.
    async fn train(&self, set: &TrainingSet) -> Result<ClassifierStatus>;

    /// Render a training set as a downloadable training file.
    async fn download(&self, set: &TrainingSet) -> Result<String>;

    /// Parse an uploaded training file.
    async fn upload(&self, content: &str) -> Result<ImportedData>;
}

// =============================================================================
// CLASS REPOSITORY
// =============================================================================

/// Repository for class CRUD operations.
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// List all classes.
    async fn query(&self) -> Result<Vec<ClassRecord>>;

    /// Create a class; the returned record carries its id.
    async fn post(&self, req: NewClass) -> Result<ClassRecord>;

    /// Delete a class by id.
    async fn remove(&self, id: &str) -> Result<()>;

    /// Store a changed class.
    async fn update(&self, class: &ClassRecord) -> Result<()>;
}

// =============================================================================
// TEXT REPOSITORY
// =============================================================================

/// Repository for text CRUD and tagging operations.
#[async_trait]
pub trait TextRepository: Send + Sync {
    /// List all texts.
    async fn query(&self) -> Result<Vec<TextRecord>>;

    /// Create a text; the returned record carries its id.
    async fn post(&self, req: NewText) -> Result<TextRecord>;

    /// Delete a text by id.
    async fn remove(&self, id: &str) -> Result<()>;

    /// Store a changed text.
    async fn update(&self, text: &TextRecord) -> Result<()>;

    /// Append class labels to a stored text.
    async fn add_classes(&self, id: &str, labels: &[String]) -> Result<()>;

    /// Remove every reference to the given labels from a stored text.
    async fn remove_classes(&self, id: &str, labels: &[String]) -> Result<()>;
}
