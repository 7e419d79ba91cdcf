use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use parla_config::Config;
use parla_core::store::{FileStore, KeyValueStore, MemoryStore};
use parla_translator::{GeminiTranslator, Translator};

pub mod command;
pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod session;
pub mod state;
pub mod ui;

use self::controller::AppController;
use self::profile::ProfileDir;
use self::state::AppState;


/// Live translation in the terminal
#[derive(Debug, Parser)]
#[command(name = "parla", version)]
struct Args {
    /// Settings profile to load
    #[arg(long, default_value = "main")]
    profile: String,

    /// Directory for preferences, history and generated speech
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Quiet period after typing before a request is sent
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Create a profile copied from main, print its path and exit
    #[arg(long, value_name = "NAME")]
    new_profile: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    if let Some(name) = &args.new_profile {
        let profiles = ProfileDir::default_location()
            .context("No configuration directory on this platform")?;
        profiles.init()?;
        let path = profiles.add_from_main(name)?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = load_config(&args);

    let data_dir = config.storage.resolve(dirs::data_dir);
    let store = open_store(data_dir.as_ref());

    let translator: Arc<dyn Translator> = {
        let t = &config.translator;
        Arc::new(
            GeminiTranslator::new(t.api_key.clone(), t.api_url.clone())
                .with_models(t.model.clone(), t.tts_model.clone())
                .with_voice(t.voice.clone())
                .with_temperature(t.temperature),
        )
    };

    let metadata = translator.metadata();
    tracing::info!("Translating with {} ({})", metadata.name, metadata.model);
    if metadata.requires_api_key && config.translator.api_key.is_empty() {
        tracing::warn!("No API key configured; set GEMINI_API_KEY to enable translation");
    }

    let state = Arc::new(AppState::new(config, store, data_dir));
    let controller = AppController::new(state);
    let stopped = controller.cancelled();
    let mut tasks = controller.spawn_tasks(translator);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        _ = stopped.cancelled() => {
            tracing::info!("Application stopping");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("task exited"),
                Ok(Err(e)) => tracing::error!("task failed: {e:#}"),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::debug!("task finished with error during shutdown: {e:#}");
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {e}");
    }
}

/// Profile file, then environment, then command line
fn load_config(args: &Args) -> Config {
    let mut config = match ProfileDir::default_location() {
        Some(profiles) => {
            if let Err(e) = profiles.init() {
                tracing::warn!("Could not create profile directory: {e:#}");
            }
            profiles.load(&args.profile).unwrap_or_else(|e| {
                tracing::warn!("Could not load profile {}: {e:#}", args.profile);
                Config::new()
            })
        }
        None => Config::new(),
    };

    if let Some(dir) = &args.data_dir {
        config.storage.data_dir = Some(dir.display().to_string());
    }
    if let Some(ms) = args.debounce_ms {
        config.pipeline.debounce_ms = ms;
    }

    config
}

fn open_store(data_dir: Option<&PathBuf>) -> Arc<dyn KeyValueStore> {
    let Some(dir) = data_dir else {
        tracing::warn!("No data directory available; settings will not be kept");
        return Arc::new(MemoryStore::new());
    };

    match FileStore::open(dir.clone()) {
        Ok(store) => {
            tracing::info!("Storing data in {}", dir.display());
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Falling back to memory storage: {e}");
            Arc::new(MemoryStore::new())
        }
    }
}
