//! HTTP client for the hosted agents service
//!
//! Talks to a project endpoint exposing the assistants/threads/runs REST
//! surface. Uses a long-lived reqwest::Client for connection pooling.
//! The bearer token is acquired elsewhere and handed in as configuration.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

use super::{AgentBackend, AssistantInfo, RunInfo, ThreadMessage};
use crate::error::WorkerError;
use crate::Result;

const PAGE_LIMIT: &str = "100";

/// Reusable agents client (connection-pooled)
pub struct FoundryAgentClient {
    client: Client,
    endpoint: String,
    api_version: String,
    token: String,
}

impl FoundryAgentClient {
    pub fn new(endpoint: &str, api_version: &str, token: String) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(WorkerError::Config(
                "AGENT_ENDPOINT not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.endpoint, path);
        let builder = self
            .client
            .request(method, url)
            .query(&[("api-version", self.api_version.as_str())]);

        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            error!(path, error = %e, "Agent service request failed");
            WorkerError::AgentService(format!("request to {} failed: {}", path, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(path, %status, body = %error_text, "Agent service error response");
            return Err(WorkerError::AgentService(format!(
                "{} returned {}: {}",
                path, status, error_text
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!(path, error = %e, "Failed to decode agent service response");
            WorkerError::AgentService(format!("invalid response from {}: {}", path, e))
        })
    }
}

/// One page of a cursor-paginated listing
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_instructions: Option<&'a str>,
}

#[async_trait]
impl AgentBackend for FoundryAgentClient {
    async fn list_assistants(&self) -> Result<Vec<AssistantInfo>> {
        let path = "/assistants";
        let mut assistants = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut builder = self
                .request(Method::GET, path)
                .query(&[("limit", PAGE_LIMIT)]);
            if let Some(cursor) = &after {
                builder = builder.query(&[("after", cursor.as_str())]);
            }

            let page: ListResponse<AssistantInfo> = self.send(builder, path).await?;
            let cursor = page
                .last_id
                .clone()
                .or_else(|| page.data.last().map(|a| a.id.clone()));
            let has_more = page.has_more;
            assistants.extend(page.data);

            // A repeated cursor would loop forever
            match cursor {
                Some(cursor) if has_more && after.as_deref() != Some(cursor.as_str()) => {
                    after = Some(cursor);
                }
                _ => break,
            }
        }

        debug!(count = assistants.len(), "Listed assistants");
        Ok(assistants)
    }

    async fn create_thread(&self) -> Result<String> {
        let path = "/threads";
        let created: Created = self
            .send(self.request(Method::POST, path).json(&json!({})), path)
            .await?;
        Ok(created.id)
    }

    async fn create_message(&self, thread_id: &str, content: &str) -> Result<String> {
        let path = format!("/threads/{}/messages", thread_id);
        let body = CreateMessageRequest {
            role: "user",
            content,
        };
        let created: Created = self
            .send(self.request(Method::POST, &path).json(&body), &path)
            .await?;
        Ok(created.id)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        additional_instructions: Option<&str>,
    ) -> Result<RunInfo> {
        let path = format!("/threads/{}/runs", thread_id);
        let body = CreateRunRequest {
            assistant_id,
            additional_instructions,
        };
        self.send(self.request(Method::POST, &path).json(&body), &path)
            .await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<RunInfo> {
        let path = format!("/threads/{}/runs/{}", thread_id, run_id);
        self.send(self.request(Method::GET, &path), &path).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let path = format!("/threads/{}/messages", thread_id);
        let list: ListResponse<Value> = self
            .send(
                self.request(Method::GET, &path)
                    .query(&[("order", "asc"), ("limit", PAGE_LIMIT)]),
                &path,
            )
            .await?;

        // Skip entries that do not look like messages rather than failing the job
        let messages = list
            .data
            .into_iter()
            .filter_map(|raw| serde_json::from_value::<ThreadMessage>(raw).ok())
            .collect();

        Ok(messages)
    }
}
