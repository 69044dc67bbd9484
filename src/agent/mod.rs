//! Agent query adapter
//!
//! One prompt in, one reply out. The adapter drives a hosted assistant
//! through a fresh conversation:
//!
//! VERIFY ASSISTANT? → THREAD → USER MESSAGE → RUN → POLL → LAST ASSISTANT MESSAGE
//!
//! No retry happens here. A failed run is returned as an error and the
//! workflow engine decides whether to try again.

use crate::error::WorkerError;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub mod foundry;
pub mod throttle;

pub use foundry::FoundryAgentClient;
pub use throttle::{CallThrottle, FixedDelay, NoThrottle};

//
// ================= Wire Types =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling | RunStatus::Unknown
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl RunInfo {
    fn failure_description(&self) -> String {
        match &self.last_error {
            Some(RunError {
                message: Some(message),
                ..
            }) => message.clone(),
            Some(RunError {
                code: Some(code), ..
            }) => code.clone(),
            _ => match self.status {
                RunStatus::RequiresAction => {
                    "run requested tool outputs, which this worker does not provide".to_string()
                }
                _ => "Unknown error".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageText {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: MessageText },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    pub fn is_assistant(&self) -> bool {
        self.role == "assistant"
    }

    /// First non-empty text part, trimmed
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find_map(|part| match part {
                MessageContent::Text { text } => Some(text.value.trim()).filter(|t| !t.is_empty()),
                _ => None,
            })
    }
}

//
// ================= Backend =================
//

/// Low-level operations of the hosted agents service
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn list_assistants(&self) -> Result<Vec<AssistantInfo>>;
    async fn create_thread(&self) -> Result<String>;
    async fn create_message(&self, thread_id: &str, content: &str) -> Result<String>;
    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        additional_instructions: Option<&str>,
    ) -> Result<RunInfo>;
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<RunInfo>;
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;
}

//
// ================= Replies =================
//

/// Reply of one agent query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentReply {
    NoContent,
    Structured(Value),
    Text(String),
}

impl AgentReply {
    /// JSON when the text parses as JSON, otherwise the trimmed text
    pub fn parse(text: Option<&str>) -> Self {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return AgentReply::NoContent;
        };
        match serde_json::from_str::<Value>(text) {
            Ok(value) => AgentReply::Structured(value),
            Err(_) => AgentReply::Text(text.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AgentReply::NoContent)
    }

    pub fn into_value(self) -> Value {
        match self {
            AgentReply::NoContent => Value::Null,
            AgentReply::Structured(value) => value,
            AgentReply::Text(text) => Value::String(text),
        }
    }
}

/// Query interface used by agent-backed tasks
#[async_trait]
pub trait AgentQuery: Send + Sync {
    async fn query(&self, assistant_id: &str, prompt: &str) -> Result<AgentReply>;
}

//
// ================= Adapter =================
//

#[derive(Debug, Clone)]
pub struct AdapterOptions {
    pub poll_interval: Duration,
    pub verify_assistant: bool,
    pub additional_instructions: Option<String>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            verify_assistant: true,
            additional_instructions: Some(
                "Please provide a helpful and detailed response.".to_string(),
            ),
        }
    }
}

pub struct AgentQueryAdapter {
    backend: Arc<dyn AgentBackend>,
    options: AdapterOptions,
}

impl AgentQueryAdapter {
    pub fn new(backend: Arc<dyn AgentBackend>, options: AdapterOptions) -> Self {
        Self { backend, options }
    }

    /// Listing failures are tolerated; only a successful listing that lacks
    /// the assistant is an error.
    async fn ensure_assistant(&self, assistant_id: &str) -> Result<()> {
        match self.backend.list_assistants().await {
            Ok(assistants) => {
                if let Some(found) = assistants.iter().find(|a| a.id == assistant_id) {
                    debug!(
                        assistant_id,
                        name = found.name.as_deref().unwrap_or("N/A"),
                        "Assistant found"
                    );
                    Ok(())
                } else {
                    error!(
                        assistant_id,
                        available = assistants.len(),
                        "Assistant not found"
                    );
                    Err(WorkerError::AgentNotFound(assistant_id.to_string()))
                }
            }
            Err(e) => {
                warn!(error = %e, "Listing assistants failed, continuing with provided id");
                Ok(())
            }
        }
    }

    /// Block until the run reaches a terminal status. No deadline.
    async fn wait_for_run(&self, thread_id: &str, mut run: RunInfo) -> Result<RunInfo> {
        while !run.status.is_terminal() {
            tokio::time::sleep(self.options.poll_interval).await;
            run = self.backend.get_run(thread_id, &run.id).await?;
            debug!(run_id = %run.id, run_status = run.status.as_str(), "Polled run");
        }
        Ok(run)
    }
}

#[async_trait]
impl AgentQuery for AgentQueryAdapter {
    async fn query(&self, assistant_id: &str, prompt: &str) -> Result<AgentReply> {
        if self.options.verify_assistant {
            self.ensure_assistant(assistant_id).await?;
        }

        let thread_id = self.backend.create_thread().await?;
        info!(thread_id = %thread_id, assistant_id, "Created thread");

        let message_id = self.backend.create_message(&thread_id, prompt).await?;
        info!(
            thread_id = %thread_id,
            message_id = %message_id,
            prompt_len = prompt.len(),
            "Posted user message"
        );

        let run = self
            .backend
            .create_run(
                &thread_id,
                assistant_id,
                self.options.additional_instructions.as_deref(),
            )
            .await?;
        info!(thread_id = %thread_id, run_id = %run.id, "Created run");

        let run = self.wait_for_run(&thread_id, run).await?;

        if run.status != RunStatus::Completed {
            let message = run.failure_description();
            error!(
                run_id = %run.id,
                run_status = run.status.as_str(),
                error = %message,
                "Agent run failed"
            );
            return Err(WorkerError::AgentRunFailed {
                run_id: run.id,
                status: run.status.as_str().to_string(),
                message,
            });
        }

        info!(run_id = %run.id, "Agent run completed");

        let messages = self.backend.list_messages(&thread_id).await?;
        let last_assistant = messages
            .iter()
            .filter(|m| m.is_assistant())
            .max_by_key(|m| m.created_at);

        let reply = AgentReply::parse(last_assistant.and_then(ThreadMessage::text));

        if reply.is_empty() {
            warn!(thread_id = %thread_id, "No assistant content in thread");
        }

        Ok(reply)
    }
}

//
// ================= Tests =================
//
