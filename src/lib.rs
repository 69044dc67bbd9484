//! Compliance Task Worker
//!
//! Evaluates financial transactions against a fixed catalogue of
//! regulatory-compliance rules and forwards narrative assessments to a
//! hosted conversational agent. Jobs come from an external workflow engine:
//!
//! JOB → ROUTE BY TASK → EVALUATE RULES | QUERY AGENT → OUTPUT MAPPING

pub mod agent;
pub mod api;
pub mod coercion;
pub mod config;
pub mod error;
pub mod execution;
pub mod models;
pub mod tasks;
pub mod verification;

pub use error::{Result, WorkerError};

// Re-export common types
pub use config::WorkerConfig;
pub use execution::JobDispatcher;
pub use models::*;
pub use verification::{aggregate_status, create_default_catalogue, CategoryResult};
