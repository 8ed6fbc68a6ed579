//! NanoBrick API server binary entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use nanobrick_server::telemetry::init_tracing;
use nanobrick_server::{AppState, Config, GeminiClient, LlmError, create_router};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "nanobrick-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "NANOBRICK_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overriding configuration (e.g. 127.0.0.1:5000)
    #[arg(long)]
    bind: Option<String>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    match cli.verbose {
        0 => {}
        1 => config.logging.level = "debug".to_string(),
        _ => config.logging.level = "trace".to_string(),
    }
    config.validate()?;

    init_tracing(&config.logging)?;
    let bind_addr = config.bind_address()?;

    let mut state = AppState::new(config);
    match GeminiClient::from_config(&state.config.llm) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Gemini advisor initialised");
            state = state.with_advisor(Arc::new(client));
        }
        Err(LlmError::NotConfigured) => {
            tracing::warn!("GOOGLE_API_KEY not set, LLM calls will use fallback");
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to initialise Gemini, using fallback");
        }
    }

    let app = create_router(Arc::new(state));

    tracing::info!("Starting NanoBrick API at http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
