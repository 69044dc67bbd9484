//! Job dispatch
//!
//! Looks up the handler for a job's task, runs it and reports the output.
//! Retry and dead-lettering belong to the workflow engine.

use crate::error::WorkerError;
use crate::models::{Job, JobResult};
use crate::tasks::TaskRouter;
use crate::Result;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct JobDispatcher {
    router: TaskRouter,
}

impl JobDispatcher {
    pub fn new(router: TaskRouter) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &TaskRouter {
        &self.router
    }

    /// Run one job to completion (fail-fast, no retry)
    pub async fn dispatch(&self, job: Job) -> Result<JobResult> {
        debug!(job_id = %job.id, task = %job.task, "Received job");

        if job.task.trim().is_empty() {
            warn!(job_id = %job.id, "Job has no task name");
            return Err(WorkerError::InvalidJob(format!("job {} has no task", job.id)));
        }

        let handler = match self.router.get(&job.task) {
            Some(handler) => handler,
            None => {
                warn!(job_id = %job.id, task = %job.task, "Task not registered");
                return Err(WorkerError::TaskNotRegistered(job.task));
            }
        };

        let start = Instant::now();

        match handler.execute(&job).await {
            Ok(variables) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                info!(job_id = %job.id, task = %job.task, elapsed_ms, "Job completed");

                Ok(JobResult {
                    job_id: job.id,
                    task: job.task,
                    variables,
                    execution_time_ms: elapsed_ms,
                })
            }
            Err(e) => {
                warn!(
                    job_id = %job.id,
                    task = %job.task,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Job failed"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskHandler;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::sync::Arc;

    struct EchoTask;

    #[async_trait]
    impl TaskHandler for EchoTask {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echoes the job variables"
        }

        async fn execute(&self, job: &Job) -> Result<Value> {
            Ok(Value::Object(job.variables.clone()))
        }
    }

    struct BrokenTask;

    #[async_trait]
    impl TaskHandler for BrokenTask {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn description(&self) -> &'static str {
            "Always fails"
        }

        async fn execute(&self, _job: &Job) -> Result<Value> {
            Err(WorkerError::AgentService("upstream returned 503".into()))
        }
    }

    fn dispatcher() -> JobDispatcher {
        let mut router = TaskRouter::new();
        router.register(Arc::new(EchoTask));
        router.register(Arc::new(BrokenTask));
        JobDispatcher::new(router)
    }

    fn variables(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_returns_handler_output() {
        let result = dispatcher()
            .dispatch(Job::new("42", "echo", variables(json!({ "a": 1 }))))
            .await
            .unwrap();

        assert_eq!(result.job_id, "42");
        assert_eq!(result.task, "echo");
        assert_eq!(result.variables, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_registered() {
        let err = dispatcher()
            .dispatch(Job::new("1", "nope", Map::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::TaskNotRegistered(ref t) if t == "nope"));
    }

    #[tokio::test]
    async fn test_blank_task_is_invalid() {
        let err = dispatcher()
            .dispatch(Job::new("1", "  ", Map::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::InvalidJob(_)));
    }

    #[tokio::test]
    async fn test_handler_failure_is_surfaced() {
        let err = dispatcher()
            .dispatch(Job::new("1", "broken", Map::new()))
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_dispatch_with_default_catalogue() {
        let config = crate::config::WorkerConfig::default();
        let dispatcher = JobDispatcher::new(crate::tasks::create_default_router(&config).unwrap());

        let job = Job::new(
            "7",
            "channel-consistency",
            variables(json!({
                "data": {
                    "channel": "RTGS",
                    "booking_datetime": "2024-03-01T10:00:00",
                    "value_date": "01/03/2024"
                }
            })),
        );

        let result = tokio_test::block_on(dispatcher.dispatch(job)).unwrap();
        assert!(result.variables["channel"]["tests"].is_object());
    }
}
