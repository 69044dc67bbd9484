//! Task handlers and the dispatch router
//!
//! Rule tasks are deterministic and synchronous under the hood.
//! Agent tasks forward the job to the hosted agents service.

use crate::agent::{
    AgentQuery, AgentQueryAdapter, AgentReply, CallThrottle, FixedDelay, FoundryAgentClient,
    NoThrottle,
};
use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::models::Job;
use crate::verification::{create_default_catalogue, RuleCatalogue, RuleCategory};
use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub const NON_DETERMINISTIC_TASK: &str = "non-deterministic-tests";
pub const REPORT_TASK: &str = "ai-report";
pub const ADVISOR_TASK: &str = "ai-advisor";

/// Trait for a single dispatchable task
#[async_trait]
pub trait TaskHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;

    /// Produce the output mapping merged back into the job variables
    async fn execute(&self, job: &Job) -> Result<Value>;
}

/// Task router for looking up handlers by task name
pub struct TaskRouter {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
}

impl TaskRouter {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn TaskHandler>) {
        self.handlers.insert(handler.name().to_string(), handler);
    }

    pub fn get(&self, task: &str) -> Option<Arc<dyn TaskHandler>> {
        self.handlers.get(task).cloned()
    }

    /// Registered task names, sorted
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TaskRouter {
    fn default() -> Self {
        Self::new()
    }
}

//
// ================= Rule Tasks =================
//

/// Evaluates one rule category against `variables["data"]`
pub struct RuleCategoryTask {
    category: Arc<RuleCategory>,
}

impl RuleCategoryTask {
    pub fn new(category: Arc<RuleCategory>) -> Self {
        Self { category }
    }
}

#[async_trait]
impl TaskHandler for RuleCategoryTask {
    fn name(&self) -> &'static str {
        self.category.task()
    }

    fn description(&self) -> &'static str {
        self.category.title()
    }

    async fn execute(&self, job: &Job) -> Result<Value> {
        let record = job.record();
        let result = self.category.evaluate(&record);

        info!(
            job_id = %job.id,
            task = self.category.task(),
            overall_status = %result.overall_status(),
            "Rule category evaluated"
        );

        self.category.output(&result)
    }
}

//
// ================= Agent Tasks =================
//

/// How an agent reply lands in the job output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// The reply itself is the output
    Raw,
    /// The reply is wrapped under the given key
    Wrapped(&'static str),
}

impl ReplyShape {
    fn shape(&self, reply: AgentReply) -> Value {
        match self {
            ReplyShape::Raw => reply.into_value(),
            ReplyShape::Wrapped(key) => {
                let mut out = Map::new();
                out.insert(key.to_string(), reply.into_value());
                Value::Object(out)
            }
        }
    }
}

/// Sends the serialized job variables to an assistant
pub struct AgentTask {
    name: &'static str,
    description: &'static str,
    assistant_id: String,
    shape: ReplyShape,
    agent: Arc<dyn AgentQuery>,
    throttle: Arc<dyn CallThrottle>,
}

impl AgentTask {
    pub fn new(
        name: &'static str,
        description: &'static str,
        assistant_id: impl Into<String>,
        shape: ReplyShape,
        agent: Arc<dyn AgentQuery>,
    ) -> Self {
        Self {
            name,
            description,
            assistant_id: assistant_id.into(),
            shape,
            agent,
            throttle: Arc::new(NoThrottle),
        }
    }

    pub fn with_throttle(mut self, throttle: Arc<dyn CallThrottle>) -> Self {
        self.throttle = throttle;
        self
    }
}

#[async_trait]
impl TaskHandler for AgentTask {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    async fn execute(&self, job: &Job) -> Result<Value> {
        if self.assistant_id.trim().is_empty() {
            return Err(WorkerError::Config(format!(
                "no assistant configured for task {}",
                self.name
            )));
        }

        let prompt = job.prompt()?;
        debug!(job_id = %job.id, task = self.name, prompt_len = prompt.len(), "Querying agent");

        let reply = self.agent.query(&self.assistant_id, &prompt).await;

        // The delay applies whether or not the call succeeded
        self.throttle.after_call().await;

        Ok(self.shape.shape(reply?))
    }
}

/// Stand-in used when no agents endpoint is configured
pub struct UnconfiguredAgent;

#[async_trait]
impl AgentQuery for UnconfiguredAgent {
    async fn query(&self, _assistant_id: &str, _prompt: &str) -> Result<AgentReply> {
        Err(WorkerError::Config(
            "AGENT_ENDPOINT not configured".to_string(),
        ))
    }
}

//
// ================= Wiring =================
//

/// Register every rule category and the three agent tasks
pub fn create_router(
    catalogue: &RuleCatalogue,
    config: &WorkerConfig,
    agent: Arc<dyn AgentQuery>,
) -> TaskRouter {
    let mut router = TaskRouter::new();

    for category in catalogue.categories() {
        router.register(Arc::new(RuleCategoryTask::new(category.clone())));
    }

    let assistants = &config.agent.assistants;
    let delayed: Arc<dyn CallThrottle> = if config.agent.post_call_delay.is_zero() {
        Arc::new(NoThrottle)
    } else {
        Arc::new(FixedDelay::new(config.agent.post_call_delay))
    };

    router.register(Arc::new(AgentTask::new(
        NON_DETERMINISTIC_TASK,
        "Non-deterministic assessment by the compliance assistant",
        assistants.non_deterministic.clone(),
        ReplyShape::Raw,
        agent.clone(),
    )));

    router.register(Arc::new(
        AgentTask::new(
            REPORT_TASK,
            "Narrative compliance report",
            assistants.report.clone(),
            ReplyShape::Wrapped("report"),
            agent.clone(),
        )
        .with_throttle(delayed.clone()),
    ));

    router.register(Arc::new(
        AgentTask::new(
            ADVISOR_TASK,
            "Advisory assessment of the transaction",
            assistants.advisor.clone(),
            ReplyShape::Wrapped("assessment"),
            agent,
        )
        .with_throttle(delayed),
    ));

    router
}

/// Build the agent client from configuration, or a stand-in when unset
pub fn create_agent(config: &WorkerConfig) -> Result<Arc<dyn AgentQuery>> {
    if !config.agent.is_configured() {
        return Ok(Arc::new(UnconfiguredAgent));
    }

    let backend = FoundryAgentClient::new(
        &config.agent.endpoint,
        &config.agent.api_version,
        config.agent.api_token.clone(),
    )?;

    Ok(Arc::new(AgentQueryAdapter::new(
        Arc::new(backend),
        config.agent.adapter_options(),
    )))
}

/// Create the router with the built-in catalogue and configured agent
pub fn create_default_router(config: &WorkerConfig) -> Result<TaskRouter> {
    let agent = create_agent(config)?;
    Ok(create_router(&create_default_catalogue(), config, agent))
}

//
// ================= Tests =================
//
