// src/main.rs — Professor entry point

use clap::Parser;
use std::path::{Path, PathBuf};

use professor::cli::{Cli, Commands};
use professor::infra::config::Config;
use professor::infra::logger;
use professor::infra::prompt;
use professor::provider::anthropic::AnthropicService;
use professor::session::{SessionController, SessionId, SessionStore};

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG / PROFESSOR_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(Path::new(path))?
    } else {
        Config::load()?
    };
    if let Some(ref model) = cli.model {
        config.provider.model = model.clone();
    }
    if let Some(ref dir) = cli.sessions_dir {
        config.storage.sessions_dir = Some(PathBuf::from(dir));
    }

    let sessions_dir = config.sessions_dir()?;
    let mut store = SessionStore::open(&sessions_dir).map_err(|e| {
        anyhow::anyhow!("cannot open sessions directory {}: {}", sessions_dir.display(), e)
    })?;
    tracing::info!(
        "{} session(s) in {}",
        store.list_sessions().len(),
        sessions_dir.display()
    );

    // Dispatch subcommands that don't need a provider
    let start = match cli.command {
        Some(Commands::Sessions) => {
            return professor::cli::sessions::run_sessions(&store);
        }
        Some(Commands::Chat { session: Some(ref raw) }) => {
            let id: SessionId = raw.parse()?;
            if store.metadata(id).is_none() {
                anyhow::bail!("Session {} not found in {}", id, sessions_dir.display());
            }
            Some(id)
        }
        Some(Commands::Chat { session: None }) | None => None,
    };

    // One service handle and one system prompt for the whole process
    let system_prompt = prompt::load_system_prompt(&config)?;
    let service = AnthropicService::new(config.api_key()?, &config.provider)?;
    tracing::info!("Using model {}", service.model());

    let controller = SessionController::new(&service, &system_prompt);
    professor::cli::chat::run_chat(&mut store, &controller, start).await
}
