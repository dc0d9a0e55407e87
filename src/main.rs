use anyhow::{Context, Result};
use clap::Parser;
use sqsdeck::audit::AuditLog;
use sqsdeck::config::Config;
use sqsdeck::constants::ERROR_GATEWAY_UNREACHABLE;
use sqsdeck::gateway::{signing::Credentials, QueueGateway, SqsGateway};
use sqsdeck::logger::Logger;
use sqsdeck::ui::{self, AppState, Connection, Settings};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sqsdeck", version, about = "Browse and manage Amazon SQS queues from the terminal")]
struct Args {
    /// Configuration file (default: ./sqsdeck.toml, then the user config directory)
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Custom SQS endpoint, e.g. http://localhost:4566
    #[arg(long)]
    endpoint_url: Option<String>,
    #[arg(long)]
    region: Option<String>,
    /// Shared credentials profile (default: $AWS_PROFILE, then "default")
    #[arg(long)]
    profile: Option<String>,
    /// Write a default configuration file and exit
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = args.generate_config {
        let path = match path {
            Some(path) => path,
            None => Config::get_default_config_path()?,
        };
        return Config::generate_default_config(path);
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(region) = args.region {
        config.aws.region = region;
    }
    if let Some(profile) = args.profile {
        config.aws.profile = profile;
    }
    if let Some(endpoint) = args.endpoint_url {
        config.aws.endpoint_url = Some(endpoint);
    }
    config.validate()?;

    let logger = Logger::from_config(&config.logging)?;
    if let Some(file) = logger.file() {
        log::info!("sqsdeck {} starting, logging to {}", env!("CARGO_PKG_VERSION"), file.display());
    }

    let audit = if config.audit.enabled {
        match &config.audit.path {
            Some(path) => AuditLog::new(path),
            None => AuditLog::new(AuditLog::default_path()?),
        }
    } else {
        log::warn!("Audit log disabled; message deletions will not be recorded");
        AuditLog::disabled()
    };

    let gateway = SqsGateway::new(
        &config.aws.region,
        config.aws.endpoint_url.as_deref(),
        Credentials::resolve(&config.aws.profile),
        config.aws.request_timeout(),
    )
    .context("Failed to create SQS client")?;

    // Fail fast before taking over the terminal
    if let Err(e) = gateway.list_queues().await {
        log::error!("Startup ListQueues against {} failed: {}", gateway.endpoint(), e);
        anyhow::bail!("{} at {}: {}", ERROR_GATEWAY_UNREACHABLE, gateway.endpoint(), e);
    }

    let state = AppState::new(Settings::from(&config.ui)).with_connection(Connection::from(&config.aws));
    let gateway: Arc<dyn QueueGateway> = Arc::new(gateway);
    ui::run_app(state, gateway, audit, config.aws.request_timeout()).await
}
