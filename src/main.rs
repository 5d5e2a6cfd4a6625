use anyhow::Result;
use clap::Parser;
use tracing::info;

use cockpit::api::ApiClient;
use cockpit::config::ClientConfig;
use cockpit::tui;

#[derive(Parser)]
#[command(name = "cockpit", about = "Operator console for the agentic control plane.")]
struct Cli {
    /// Backend base URL (e.g. http://127.0.0.1:8333). Overrides config file.
    #[arg(short, long)]
    url: Option<String>,

    /// Poll interval in milliseconds. Overrides config file.
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Fetch every state slice once, log a summary, and exit (no terminal).
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cockpit=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::load();
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(ms) = cli.interval_ms {
        config.poll_interval_ms = ms;
    }

    info!("cockpit connecting to {}", config.base_url);
    let client = ApiClient::new(config.base_url.clone());

    if cli.once {
        return tui::poll::probe_once(&client).await;
    }

    tui::runner::run_tui(client, &config).await
}
