//! Structured logging field name constants for groundtruth.
//!
//! All crates use these constants for consistent structured logging fields
//! so log output can be queried by the same names everywhere.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation aborted, state may need operator attention |
//! | WARN  | A service call failed and the error was returned to the caller |
//! | INFO  | Lifecycle events (load, import, export, train) |
//! | DEBUG | Individual user actions (rename, tag, delete) |
//! | TRACE | Per-item iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "core", "services", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "rename_class", "tag_checked_texts", "import_file"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Class label being operated on.
pub const LABEL: &str = "label";

/// Previous label of a renamed class.
pub const OLD_LABEL: &str = "old_label";

/// New label of a renamed class.
pub const NEW_LABEL: &str = "new_label";

/// Repository id of a class or text.
pub const RECORD_ID: &str = "record_id";

/// Classifier id returned by a training request.
pub const CLASSIFIER_ID: &str = "classifier_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of classes involved.
pub const CLASS_COUNT: &str = "class_count";

/// Number of texts involved.
pub const TEXT_COUNT: &str = "text_count";

/// Number of text class references rewritten or added.
pub const REFERENCE_COUNT: &str = "reference_count";

/// Byte length of a training file.
pub const CONTENT_LEN: &str = "content_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
