//! Worker configuration
//!
//! Read once at startup from the environment (a `.env` file is honoured)
//! and passed explicitly to whatever needs it.

use crate::agent::AdapterOptions;
use crate::error::WorkerError;
use crate::Result;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_ADDITIONAL_INSTRUCTIONS: &str = "Please provide a helpful and detailed response.";

/// Opaque assistant ids, one per agent-backed task
#[derive(Debug, Clone, Default)]
pub struct AssistantIds {
    pub non_deterministic: String,
    pub report: String,
    pub advisor: String,
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub endpoint: String,
    pub api_token: String,
    pub api_version: String,
    pub poll_interval: Duration,
    pub post_call_delay: Duration,
    pub verify_assistant: bool,
    pub additional_instructions: Option<String>,
    pub assistants: AssistantIds,
}

impl AgentSettings {
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    pub fn adapter_options(&self) -> AdapterOptions {
        AdapterOptions {
            poll_interval: self.poll_interval,
            verify_assistant: self.verify_assistant,
            additional_instructions: self.additional_instructions.clone(),
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_token: String::new(),
            api_version: "v1".to_string(),
            poll_interval: Duration::from_millis(1000),
            post_call_delay: Duration::from_secs(10),
            verify_assistant: true,
            additional_instructions: Some(DEFAULT_ADDITIONAL_INSTRUCTIONS.to_string()),
            assistants: AssistantIds::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub port: u16,
    pub agent: AgentSettings,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            agent: AgentSettings::default(),
        }
    }
}

impl WorkerConfig {
    /// Load `.env` if present, then read process environment variables
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_process_env()
    }

    /// Load the given env file, then read process environment variables.
    /// Variables already set in the process take precedence over the file.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        dotenv::from_path(path).map_err(|e| {
            WorkerError::Config(format!("cannot load {}: {}", path.display(), e))
        })?;
        Self::from_process_env()
    }

    fn from_process_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = WorkerConfig::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(v) => parse("PORT", &v)?,
            None => defaults.port,
        };

        let poll_interval = match get("AGENT_POLL_INTERVAL_MS") {
            Some(v) => Duration::from_millis(parse("AGENT_POLL_INTERVAL_MS", &v)?),
            None => defaults.agent.poll_interval,
        };

        let post_call_delay = match get("AGENT_POST_CALL_DELAY_SECS") {
            Some(v) => Duration::from_secs(parse("AGENT_POST_CALL_DELAY_SECS", &v)?),
            None => defaults.agent.post_call_delay,
        };

        let verify_assistant = match get("AGENT_VERIFY_ASSISTANT") {
            Some(v) => parse_bool("AGENT_VERIFY_ASSISTANT", &v)?,
            None => defaults.agent.verify_assistant,
        };

        let additional_instructions = match lookup("AGENT_ADDITIONAL_INSTRUCTIONS") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v),
            None => defaults.agent.additional_instructions,
        };

        Ok(Self {
            port,
            agent: AgentSettings {
                endpoint: get("AGENT_ENDPOINT").unwrap_or_default(),
                api_token: get("AGENT_API_TOKEN").unwrap_or_default(),
                api_version: get("AGENT_API_VERSION").unwrap_or(defaults.agent.api_version),
                poll_interval,
                post_call_delay,
                verify_assistant,
                additional_instructions,
                assistants: AssistantIds {
                    non_deterministic: get("ASSISTANT_NON_DETERMINISTIC").unwrap_or_default(),
                    report: get("ASSISTANT_REPORT").unwrap_or_default(),
                    advisor: get("ASSISTANT_ADVISOR").unwrap_or_default(),
                },
            },
        })
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| WorkerError::Config(format!("{} has invalid value '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(WorkerError::Config(format!(
            "{} has invalid value '{}'",
            key, value
        ))),
    }
}
