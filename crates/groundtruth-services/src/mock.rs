//! Mock training service for deterministic testing.
//!
//! ## Usage
//!
//! ```rust
//! use groundtruth_services::mock::MockTrainingService;
//!
//! let service = MockTrainingService::new().with_download("a,b\n");
//! assert_eq!(service.call_count("upload"), 0);
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use groundtruth_core::defaults::{
    CLASSIFIER_LANGUAGE, CLASSIFIER_NAME, MOCK_UPLOAD_CLASS, MOCK_UPLOAD_TEXT, STATUS_TRAINING,
};
use groundtruth_core::{
    ClassifierStatus, Error, ImportedData, LabeledText, Result, TrainingService, TrainingSet,
};

/// Mock training service for testing.
#[derive(Clone)]
pub struct MockTrainingService {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    upload_response: ImportedData,
    download_response: String,
    latency_ms: u64,
    failure_rate: f64,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub timestamp: std::time::Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            upload_response: ImportedData {
                classes: vec![MOCK_UPLOAD_CLASS.to_string()],
                texts: vec![LabeledText {
                    text: MOCK_UPLOAD_TEXT.to_string(),
                    classes: vec![MOCK_UPLOAD_CLASS.to_string()],
                }],
            },
            download_response: format!("{},{}\n", MOCK_UPLOAD_TEXT, MOCK_UPLOAD_CLASS),
            latency_ms: 0,
            failure_rate: 0.0,
        }
    }
}

impl MockTrainingService {
    /// Create a new mock service with default responses.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the data every upload resolves to.
    pub fn with_upload_response(mut self, data: ImportedData) -> Self {
        Arc::make_mut(&mut self.config).upload_response = data;
        self
    }

    /// Set the content every download returns.
    pub fn with_download(mut self, content: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).download_response = content.into();
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Set failure rate (0.0 - 1.0) for testing error handling.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        Arc::make_mut(&mut self.config).failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of calls to one operation ("train", "download", "upload").
    pub fn call_count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
            timestamp: std::time::Instant::now(),
        });
    }

    fn should_fail(&self) -> bool {
        use rand::Rng;
        if self.config.failure_rate > 0.0 {
            rand::thread_rng().gen::<f64>() < self.config.failure_rate
        } else {
            false
        }
    }

    async fn simulate(&self, operation: &str, input: &str) -> Result<()> {
        self.log_call(operation, input);
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
        if self.should_fail() {
            return Err(Error::Service(format!(
                "Simulated {} failure for testing",
                operation
            )));
        }
        Ok(())
    }
}

impl Default for MockTrainingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrainingService for MockTrainingService {
    async fn train(&self, set: &TrainingSet) -> Result<ClassifierStatus> {
        self.simulate("train", &set.texts.len().to_string()).await?;
        Ok(ClassifierStatus {
            classifier_id: "mock-classifier".to_string(),
            name: CLASSIFIER_NAME.to_string(),
            language: CLASSIFIER_LANGUAGE.to_string(),
            status: STATUS_TRAINING.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn download(&self, set: &TrainingSet) -> Result<String> {
        self.simulate("download", &set.texts.len().to_string())
            .await?;
        Ok(self.config.download_response.clone())
    }

    async fn upload(&self, content: &str) -> Result<ImportedData> {
        self.simulate("upload", content).await?;
        Ok(self.config.upload_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_resolves_fixed_data() {
        let service = MockTrainingService::new();

        let data = service.upload("text,class").await.unwrap();
        assert_eq!(data.classes, vec!["class"]);
        assert_eq!(data.texts[0].text, "text");
        assert_eq!(data.texts[0].classes, vec!["class"]);
    }

    #[tokio::test]
    async fn test_calls_are_logged() {
        let service = MockTrainingService::new();

        service.upload("content").await.unwrap();
        service.download(&TrainingSet::default()).await.unwrap();
        service.download(&TrainingSet::default()).await.unwrap();

        assert_eq!(service.call_count("upload"), 1);
        assert_eq!(service.call_count("download"), 2);
        assert_eq!(service.get_calls()[0].input, "content");
    }

    #[tokio::test]
    async fn test_failure_rate_one_always_fails() {
        let service = MockTrainingService::new().with_failure_rate(1.0);

        let err = service.train(&TrainingSet::default()).await.unwrap_err();
        assert!(matches!(err, Error::Service(_)));
        assert_eq!(service.call_count("train"), 1);
    }

    #[tokio::test]
    async fn test_custom_responses() {
        let service = MockTrainingService::new()
            .with_download("a,b\n")
            .with_upload_response(ImportedData::default());

        assert_eq!(
            service.download(&TrainingSet::default()).await.unwrap(),
            "a,b\n"
        );
        assert!(service.upload("").await.unwrap().texts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let service = MockTrainingService::new().with_latency_ms(500);
        let start = tokio::time::Instant::now();

        service.upload("x").await.unwrap();
        assert!(start.elapsed() >= tokio::time::Duration::from_millis(500));
    }
}
