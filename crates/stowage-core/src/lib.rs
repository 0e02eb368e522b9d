//! Stowage Core Library
//!
//! This crate provides the storage policy domain model, error types and
//! configuration shared by the naming engine, the repositories and the CLI.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::PolicyEngineConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{PolicyOptions, StoragePolicy};
pub use storage_types::StorageBackend;
