use acmedns::{api, config, AcmeDnsProvider};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "acmedns-rust")]
#[command(about = "HTTP hook service publishing DNS-01 TXT records through ACME-DNS")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (before logger init)
    let config = config::Config::load(&args.config)?;

    // Initialize logger with config log level (env var takes precedence)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.server.log_level)
    ).init();

    info!("Loading configuration from: {}", args.config);

    let provider_config = config.provider_config()?;
    match &provider_config.config {
        Some(accounts) => info!(
            "Loaded {} ACME-DNS account(s): {:?}",
            accounts.len(),
            accounts.keys().collect::<Vec<_>>()
        ),
        None => info!("Using single ACME-DNS account at {}", provider_config.server_url),
    }

    let provider = AcmeDnsProvider::new(provider_config).context("Failed to build HTTP client")?;
    let app = api::create_router(provider, config.server.key.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Record endpoint: POST|PUT|DELETE /records/{{zone}}");

    axum::serve(listener, app).await?;

    Ok(())
}
