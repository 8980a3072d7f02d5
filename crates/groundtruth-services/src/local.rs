//! Training service backed by the CSV training-file codec.
//!
//! Uploads and downloads are handled locally; a training request is
//! validated and accepted with a fresh classifier id.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use groundtruth_core::defaults::{CLASSIFIER_LANGUAGE, CLASSIFIER_NAME, STATUS_TRAINING};
use groundtruth_core::{ClassifierStatus, Error, ImportedData, Result, TrainingService, TrainingSet};

use crate::config::ServiceConfig;
use crate::csv::{parse_training_csv, render_training_csv};

/// Local training service.
#[derive(Debug, Clone)]
pub struct LocalTrainingService {
    name: String,
    language: String,
}

impl LocalTrainingService {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.classifier_name, &config.language)
    }
}

impl Default for LocalTrainingService {
    fn default() -> Self {
        Self::new(CLASSIFIER_NAME, CLASSIFIER_LANGUAGE)
    }
}

#[async_trait]
impl TrainingService for LocalTrainingService {
    async fn train(&self, set: &TrainingSet) -> Result<ClassifierStatus> {
        let tagged = set.tagged().count();
        if tagged == 0 {
            return Err(Error::InvalidInput(
                "Training set has no tagged texts".to_string(),
            ));
        }

        let status = ClassifierStatus {
            classifier_id: Uuid::new_v4().to_string(),
            name: self.name.clone(),
            language: self.language.clone(),
            status: STATUS_TRAINING.to_string(),
            created_at: Utc::now(),
        };
        info!(
            subsystem = "services",
            classifier_id = %status.classifier_id,
            text_count = tagged,
            "Accepted training request"
        );
        Ok(status)
    }

    async fn download(&self, set: &TrainingSet) -> Result<String> {
        let content = render_training_csv(set);
        debug!(subsystem = "services", content_len = content.len(), "Rendered training file");
        Ok(content)
    }

    async fn upload(&self, content: &str) -> Result<ImportedData> {
        let data = parse_training_csv(content)?;
        debug!(
            subsystem = "services",
            class_count = data.classes.len(),
            text_count = data.texts.len(),
            "Parsed training file"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundtruth_core::LabeledText;

    #[tokio::test]
    async fn test_upload_parses_csv() {
        let service = LocalTrainingService::default();

        let data = service.upload("text,class").await.unwrap();
        assert_eq!(data.classes, vec!["class"]);
        assert_eq!(data.texts[0].text, "text");
    }

    #[tokio::test]
    async fn test_train_requires_tagged_texts() {
        let service = LocalTrainingService::default();
        let set = TrainingSet {
            texts: vec![LabeledText {
                text: "untagged".into(),
                classes: vec![],
            }],
        };

        assert!(matches!(
            service.train(&set).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_train_returns_status() {
        let service = LocalTrainingService::new("weather", "es");
        let set = TrainingSet {
            texts: vec![LabeledText {
                text: "hace calor".into(),
                classes: vec!["temperature".into()],
            }],
        };

        let status = service.train(&set).await.unwrap();
        assert_eq!(status.name, "weather");
        assert_eq!(status.language, "es");
        assert_eq!(status.status, STATUS_TRAINING);
        assert!(Uuid::parse_str(&status.classifier_id).is_ok());
    }
}
