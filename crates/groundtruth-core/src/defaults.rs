//! Centralized default constants for groundtruth.
//!
//! All crates reference these constants instead of defining their own magic
//! values.

// =============================================================================
// KEYBOARD
// =============================================================================

/// Key code of the Escape key; a key-up with this code cancels inline editing.
pub const ESCAPE_KEY_CODE: u32 = 27;

// =============================================================================
// TRAINING
// =============================================================================

/// Default classifier name sent with a training request.
pub const CLASSIFIER_NAME: &str = "groundtruth";

/// Default classifier language.
pub const CLASSIFIER_LANGUAGE: &str = "en";

/// Status reported for a classifier whose training was accepted.
pub const STATUS_TRAINING: &str = "Training";

/// Default training backend ("local" or "mock").
pub const TRAINING_BACKEND: &str = "local";

/// Label the mock training service reports for an upload.
pub const MOCK_UPLOAD_CLASS: &str = "class";

/// Text the mock training service reports for an upload.
pub const MOCK_UPLOAD_TEXT: &str = "text";

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable selecting the training backend.
pub const ENV_TRAINING_BACKEND: &str = "GROUNDTRUTH_TRAINING_BACKEND";

/// Environment variable overriding the classifier name.
pub const ENV_CLASSIFIER_NAME: &str = "GROUNDTRUTH_CLASSIFIER_NAME";

/// Environment variable overriding the classifier language.
pub const ENV_LANGUAGE: &str = "GROUNDTRUTH_LANGUAGE";
