//! Error types for the compliance task worker

use thiserror::Error;

/// Result type alias for worker operations
pub type Result<T> = std::result::Result<T, WorkerError>;

#[derive(Error, Debug)]
pub enum WorkerError {

    // =============================
    // Dispatch Errors
    // =============================

    #[error("Task not registered: {0}")]
    TaskNotRegistered(String),

    #[error("Invalid job: {0}")]
    InvalidJob(String),

    // =============================
    // Agent Service Errors
    // =============================

    #[error("Agent run {run_id} ended with status '{status}': {message}")]
    AgentRunFailed {
        run_id: String,
        status: String,
        message: String,
    },

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Agent service error: {0}")]
    AgentService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WorkerError {
    /// Whether the failure originated in the external agent service
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            WorkerError::AgentRunFailed { .. }
                | WorkerError::AgentNotFound(_)
                | WorkerError::AgentService(_)
                | WorkerError::HttpError(_)
        )
    }
}
