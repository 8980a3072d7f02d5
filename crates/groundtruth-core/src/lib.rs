//! # groundtruth-core
//!
//! Core records, label-set operations and service abstractions for the
//! groundtruth text-classification labeling tool.
//!
//! The crate keeps a collection of texts and a collection of classes
//! consistent under selection, renaming and tagging. Everything that talks
//! to the outside world goes through the traits in [`traits`].

pub mod defaults;
pub mod error;
pub mod labels;
pub mod logging;
pub mod manager;
pub mod models;
pub mod session;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use labels::{Checkable, Editable, Labeled, Selectable};
pub use manager::LabelSetManager;
pub use models::*;
pub use session::TrainingSession;
pub use traits::*;
