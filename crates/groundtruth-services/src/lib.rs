//! # groundtruth-services
//!
//! Implementations of the groundtruth service capabilities:
//!
//! - [`memory`] - in-memory class and text repositories
//! - [`local`] - training service backed by the CSV training-file codec
//! - [`mock`] - deterministic training service for tests
//! - [`csv`] - training-file codec
//! - [`config`] - environment configuration and service selection

pub mod config;
pub mod csv;
pub mod local;
pub mod memory;
pub mod mock;

pub use config::{ServiceConfig, TrainingBackend};
pub use local::LocalTrainingService;
pub use memory::{InMemoryClassRepository, InMemoryTextRepository};
pub use mock::MockTrainingService;
