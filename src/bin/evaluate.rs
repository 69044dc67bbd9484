//! Evaluate a single job document and print the result.
//!
//! Usage: evaluate [job.json]   (reads stdin when no path is given)
//!
//! The document is `{"id"?, "task", "variables"}`.

use compliance_task_worker::{
    api::JobRequest, config::WorkerConfig, execution::JobDispatcher, models::Job,
    tasks::create_default_router,
};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let input = match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let request: JobRequest = serde_json::from_str(&input)?;
    let job = Job::new(
        request.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        request.task,
        request.variables,
    );

    let config = WorkerConfig::from_env()?;
    let dispatcher = JobDispatcher::new(create_default_router(&config)?);

    info!(job_id = %job.id, task = %job.task, "Evaluating job");

    let result = dispatcher.dispatch(job).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
