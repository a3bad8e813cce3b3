//! Error taxonomy shared across the pipeline crates

use thiserror::Error;

/// Errors surfaced by pipeline operations.
///
/// Callers isolate at the smallest unit: one failing notification record or
/// image record is reported and skipped, it never aborts the surrounding
/// invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No `image_<timestamp>` pattern found in an object identifier
    #[error("datetime not found in filename '{name}'")]
    MalformedFilename { name: String },

    /// Malformed payload or sidecar content
    #[error("failed to parse {context}: {message}")]
    Parse { context: String, message: String },

    /// Object store list/get/put/copy/delete failure
    #[error("storage operation failed: {message}")]
    Storage { message: String },

    /// External dependency call failed (trigger invocation, table write)
    #[error("dependency call failed: {message}")]
    Dependency { message: String },
}

impl PipelineError {
    pub fn malformed_filename(name: impl Into<String>) -> Self {
        Self::MalformedFilename { name: name.into() }
    }

    pub fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn storage(message: impl ToString) -> Self {
        Self::Storage {
            message: message.to_string(),
        }
    }

    pub fn dependency(message: impl ToString) -> Self {
        Self::Dependency {
            message: message.to_string(),
        }
    }
}

/// Result type alias for PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;
