use compliance_task_worker::{
    api::start_server, config::WorkerConfig, create_default_catalogue, execution::JobDispatcher,
    tasks::{create_agent, create_router},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WorkerConfig::from_env()?;

    info!("Compliance Task Worker - API Server");
    info!("Port: {}", config.port);

    if !config.agent.is_configured() {
        info!("AGENT_ENDPOINT not set, agent tasks will fail until configured");
    }

    // Create components
    let catalogue = Arc::new(create_default_catalogue());
    let agent = create_agent(&config)?;
    let router = create_router(&catalogue, &config, agent);
    let dispatcher = Arc::new(JobDispatcher::new(router));

    info!(
        tasks = dispatcher.router().list().len(),
        "Dispatcher initialized"
    );

    start_server(dispatcher, catalogue, config.port).await?;

    Ok(())
}
