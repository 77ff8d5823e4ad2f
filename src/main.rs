//! Bedrock Query Proxy
//!
//! Serves the query adapter over HTTP.

use anyhow::Result;
use bedrock_query_proxy::{
    config::{Environment, Settings},
    logging::{init_tracing, LogFormat},
    server::App,
};
use clap::Parser;

/// Bedrock Query Proxy
///
/// Forwards a user query to Amazon Bedrock and returns a normalized JSON envelope.
#[derive(Parser, Debug)]
#[command(name = "bedrock-query-proxy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides HOST env var)
    #[arg(long)]
    host: Option<String>,

    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long)]
    log_level: Option<String>,

    /// Environment: dev, staging, prod (overrides ENVIRONMENT env var)
    #[arg(short, long)]
    env: Option<Environment>,

    /// AWS region (overrides AWS_REGION env var)
    #[arg(long)]
    region: Option<String>,

    /// Bedrock model ID (overrides BEDROCK_MODEL_ID env var)
    #[arg(short, long)]
    model_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (before logging, so we can use log_level)
    let mut settings = Settings::load()?;

    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(env) = args.env {
        settings.environment = env;
    }
    if let Some(region) = args.region {
        settings.aws_region = region;
    }
    if let Some(model_id) = args.model_id {
        settings.set_model_id(model_id);
    }
    settings.validate()?;

    init_tracing(&settings.log_level, LogFormat::Json);

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        host = %settings.host,
        port = %settings.port,
        region = %settings.aws_region,
        model_id = %settings.model.id(),
        model_family = %settings.model.family(),
        "Starting application"
    );

    let app = App::new(settings).await?;
    app.run_with_graceful_shutdown().await?;

    tracing::info!("Application shutdown complete");

    Ok(())
}
