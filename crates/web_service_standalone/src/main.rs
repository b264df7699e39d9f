use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vox_llm::OpenAIConfig;
use web_service::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "vox-prepack", about = "Vox Ecclesiae pre-production pack service")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "APP_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "APP_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();

    let cli = Cli::parse();

    let mut server_config = ServerConfig::from_env();
    if let Some(host) = cli.host {
        server_config.host = host;
    }
    if let Some(port) = cli.port {
        server_config.port = port;
    }
    let openai_config = OpenAIConfig::from_env();

    tracing::info!(
        model = %openai_config.model,
        ai_available = openai_config.ai_available(),
        origins = ?server_config.allowed_origins,
        "Starting standalone web service..."
    );

    web_service::run(server_config, openai_config)
        .await
        .map_err(anyhow::Error::msg)
        .context("web service stopped")
}
