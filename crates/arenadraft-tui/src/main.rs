// arenadraft entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config and open the state store
// 4. Run a one-shot subcommand, or:
// 5. Restore the draft state, create the mpsc channels, spawn the
//    controller task and run the TUI until the user quits

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info};

use arenadraft_app::app;
use arenadraft_app::session_client::HttpSessionClient;
use arenadraft_core::api::SessionApi;
use arenadraft_core::catalog::Catalog;
use arenadraft_core::collection::{extract_collection, total_copies};
use arenadraft_core::config::{self, Config};
use arenadraft_core::draft::views;
use arenadraft_core::export::export_deck;
use arenadraft_core::store::Store;
use arenadraft_tui::tui;

#[derive(Parser)]
#[command(name = "arenadraft", version, about, long_about = None)]
struct Cli {
    /// Directory holding `config/` and `defaults/` (defaults to the
    /// working directory).
    #[arg(long, global = true, env = "ARENADRAFT_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the card collection from an Arena client log.
    ImportLog {
        /// Path to the Arena `output_log.txt` / `Player.log`.
        path: PathBuf,
    },
    /// Print the current deck in Arena import format.
    Export,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!("arenadraft starting up");

    let config = config::load_config(cli.config_dir.as_deref())
        .context("failed to load configuration")?;
    info!("Config loaded: server={}", config.base_url);

    let store = Store::open_file(&config.db_path).context("failed to open state store")?;
    info!("State store opened at {}", config.db_path.display());

    match cli.command {
        Some(Commands::ImportLog { path }) => import_log(&store, &path),
        Some(Commands::Export) => print_deck(&config, &store).await,
        None => run_tui(config, store).await,
    }
}

async fn run_tui(config: Config, store: Store) -> anyhow::Result<()> {
    let draft = store.restore().context("failed to restore draft state")?;
    if draft.session_id.is_some() {
        info!("Restored session state");
    } else {
        info!("Starting without a session");
    }

    let (api_tx, api_rx) = mpsc::channel(64);
    let (channel_tx, channel_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let api: Arc<dyn SessionApi> = Arc::new(HttpSessionClient::new(&config.base_url)?);
    let app_state = app::AppState::new(config, draft, store, api, api_tx, channel_tx)?;

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, api_rx, channel_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // Blocks until the user quits.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("arenadraft shut down cleanly");
    Ok(())
}

fn import_log(store: &Store, path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let collection = extract_collection(&text)?;
    let copies = total_copies(&collection);

    let mut draft = store.restore()?;
    draft.set_collection(collection, Utc::now());
    store.persist(&draft)?;

    info!("Imported {copies} cards from {}", path.display());
    println!("Imported {copies} cards from {}", path.display());
    Ok(())
}

async fn print_deck(config: &Config, store: &Store) -> anyhow::Result<()> {
    let draft = store.restore()?;
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => HttpSessionClient::new(&config.base_url)?
            .fetch_catalog()
            .await
            .context("failed to fetch card catalog")?,
    };

    let deck = views::deck_unsorted(draft.picks.as_ref(), &catalog);
    print!("{}", export_deck(&deck, config.language));
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("arenadraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("arenadraft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["arenadraft", "import-log", "/tmp/output_log.txt"]);
        match cli.command {
            Some(Commands::ImportLog { path }) => {
                assert_eq!(path, PathBuf::from("/tmp/output_log.txt"))
            }
            _ => panic!("expected import-log"),
        }

        let cli = Cli::parse_from(["arenadraft", "--config-dir", "/etc/arenadraft", "export"]);
        assert!(matches!(cli.command, Some(Commands::Export)));
        assert_eq!(cli.config_dir, Some(PathBuf::from("/etc/arenadraft")));

        let cli = Cli::parse_from(["arenadraft"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn import_log_stores_collection() {
        let dir = std::env::temp_dir().join(format!("arenadraft-import-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let log = dir.join("output_log.txt");
        std::fs::write(
            &log,
            "noise\n<== PlayerInventory.GetPlayerCardsV3(7)\n{\"100\": 4, \"200\": 1}\n",
        )
        .unwrap();

        let store = Store::open(":memory:").unwrap();
        import_log(&store, &log).unwrap();

        let draft = store.restore().unwrap();
        let collection = draft.collection.unwrap();
        assert_eq!(collection.get("100"), Some(&4));
        assert_eq!(collection.get("200"), Some(&1));
        assert!(draft.collection_date.is_some());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
