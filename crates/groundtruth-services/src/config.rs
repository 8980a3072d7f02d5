//! Service configuration.
//!
//! Configuration is read from environment variables (a `.env` file is
//! loaded by the binary before this runs):
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GROUNDTRUTH_TRAINING_BACKEND` | `local` |
//! | `GROUNDTRUTH_CLASSIFIER_NAME` | `groundtruth` |
//! | `GROUNDTRUTH_LANGUAGE` | `en` |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use groundtruth_core::defaults::{
    CLASSIFIER_LANGUAGE, CLASSIFIER_NAME, ENV_CLASSIFIER_NAME, ENV_LANGUAGE, ENV_TRAINING_BACKEND,
    TRAINING_BACKEND,
};
use groundtruth_core::{Error, Result, TrainingService};

use crate::local::LocalTrainingService;
use crate::mock::MockTrainingService;

/// Training service implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrainingBackend {
    #[default]
    Local,
    Mock,
}

impl FromStr for TrainingBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "mock" => Ok(Self::Mock),
            _ => Err(Error::Config(format!("Invalid training backend: {}", s))),
        }
    }
}

impl fmt::Display for TrainingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// Settings for building the services of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub backend: TrainingBackend,
    pub classifier_name: String,
    pub language: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: TrainingBackend::Local,
            classifier_name: CLASSIFIER_NAME.to_string(),
            language: CLASSIFIER_LANGUAGE.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup(ENV_TRAINING_BACKEND)
            .unwrap_or_else(|| TRAINING_BACKEND.to_string())
            .parse()?;
        let config = Self {
            backend,
            classifier_name: lookup(ENV_CLASSIFIER_NAME)
                .unwrap_or_else(|| CLASSIFIER_NAME.to_string()),
            language: lookup(ENV_LANGUAGE).unwrap_or_else(|| CLASSIFIER_LANGUAGE.to_string()),
        };
        config.validate()?;
        debug!(
            subsystem = "services",
            backend = %config.backend,
            classifier_name = %config.classifier_name,
            "Loaded service config"
        );
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.classifier_name.trim().is_empty() {
            return Err(Error::Config("classifier name cannot be empty".to_string()));
        }
        if self.language.trim().is_empty() {
            return Err(Error::Config("language cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Build the configured training service.
    pub fn training_service(&self) -> Arc<dyn TrainingService> {
        match self.backend {
            TrainingBackend::Local => Arc::new(LocalTrainingService::from_config(self)),
            TrainingBackend::Mock => Arc::new(MockTrainingService::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_overrides_from_variables() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_TRAINING_BACKEND, "MOCK"),
            (ENV_CLASSIFIER_NAME, "weather"),
            (ENV_LANGUAGE, "fr"),
        ]))
        .unwrap();

        assert_eq!(config.backend, TrainingBackend::Mock);
        assert_eq!(config.classifier_name, "weather");
        assert_eq!(config.language, "fr");
    }

    #[test]
    fn test_invalid_backend() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENV_TRAINING_BACKEND, "cloud")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_language_rejected() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENV_LANGUAGE, " ")])).unwrap_err();
        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn test_backend_display_round_trip() {
        for backend in [TrainingBackend::Local, TrainingBackend::Mock] {
            assert_eq!(backend.to_string().parse::<TrainingBackend>().unwrap(), backend);
        }
    }
}
