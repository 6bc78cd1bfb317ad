use clap::Parser;
use part_scout::assistant::{Assistant, OfflineResponder};
use part_scout::config::{AppConfig, load_config};
use part_scout::storage::{CatalogStore, load_catalog};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[command(
    name = "part-scout",
    about = "Answers PC part price, spec and build questions from a JSON catalog",
    version
)]
struct Args {
    /// Path to the JSON config file. Built-in defaults are used when it does not exist.
    #[arg(default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let args = Args::parse();
    let config: Arc<AppConfig> = if args.config.exists() {
        match load_config(&args.config) {
            Ok(cfg) => Arc::new(cfg),
            Err(e) => {
                error!("Config load error: {}", e);
                return;
            }
        }
    } else {
        warn!("{} not found, using built-in defaults", args.config.display());
        Arc::new(AppConfig::default())
    };

    let store = match load_catalog(&config.catalog_path) {
        Ok(catalog) => CatalogStore::new(catalog),
        Err(e) => {
            error!("Failed to load catalog at {}: {}", config.catalog_path, e);
            return;
        }
    };

    let responder = Arc::new(OfflineResponder::new(config.fallback_message.clone()));
    let assistant = Assistant::new(&config, responder);

    info!("Ready. One question per line, Ctrl-D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read error: {}", e);
                break;
            }
        };

        if line.trim() == ":reload" {
            match store.reload(&config.catalog_path) {
                Ok(catalog) => info!(
                    "Catalog reloaded: {} records, loaded at {}",
                    catalog.len(),
                    catalog.loaded_at.format("%Y-%m-%d %H:%M:%S")
                ),
                Err(e) => warn!("Reload failed, keeping current catalog: {}", e),
            }
            continue;
        }

        let catalog = store.snapshot();
        debug!("Answering from snapshot {}s old", catalog.age().num_seconds());
        let answer = assistant.answer(&catalog, &line).await;
        println!("{}\n", answer.to_text(&config.currency_symbol));
    }

    info!("Bye.");
}
