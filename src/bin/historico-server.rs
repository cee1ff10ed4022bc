//! HTTP server binary for analise-historico.
//!
//! A thin shim over the library crate: reads configuration from flags and
//! the environment, builds the Gemini client once at startup, and serves
//! the router.

use analise_historico::{AnalysisConfig, AppState, GeminiClient};
use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "historico-server",
    about = "Transcript analysis HTTP service (histórico escolar → credit-waiver comparison)",
    version
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Gemini API key. Prefer the environment over the command line.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model identifier.
    #[arg(long, env = "GEMINI_MODEL", default_value = analise_historico::DEFAULT_MODEL)]
    model: String,

    /// Base URL of the generateContent endpoint (proxies, test doubles).
    #[arg(long, env = "GEMINI_API_BASE_URL", default_value = analise_historico::DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Path to the LibreOffice soffice executable (otherwise resolved from
    /// SOFFICE_PATH or well-known install locations).
    #[arg(long, env = "SOFFICE_PATH")]
    soffice_path: Option<PathBuf>,

    /// Document download timeout in seconds.
    #[arg(long, default_value_t = 120)]
    download_timeout: u64,

    /// Model call timeout in seconds.
    #[arg(long, default_value_t = 300)]
    api_timeout: u64,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut builder = AnalysisConfig::builder()
        .api_key(cli.api_key)
        .model(cli.model)
        .api_base_url(cli.api_base_url)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);
    if let Some(path) = cli.soffice_path {
        builder = builder.soffice_path(path);
    }
    let mut config = builder.build().context("Invalid configuration")?;

    // Build the model client once; every request shares it instead of
    // re-reading credentials at call time.
    let client = GeminiClient::new(&config).context("Failed to build Gemini client")?;
    config.model_provider = Some(Arc::new(client));

    let state = Arc::new(AppState { config });
    let app = analise_historico::router(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid host/port")?;
    tracing::info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
