use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use blogdeck::app::App;
use blogdeck::blog::{Blog, BlogOptions};
use blogdeck::catalog;
use blogdeck::config::Config;
use blogdeck::keybindings::KeybindingRegistry;
use blogdeck::storage::{Article, Database, DatabaseError, Store};
use blogdeck::ui;

/// Get the config directory path (~/.config/blogdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("blogdeck"))
}

#[derive(Parser, Debug)]
#[command(
    name = "blogdeck",
    about = "Terminal blog browser with search, filters and local comments"
)]
struct Args {
    /// Delete the local store (articles, comments, theme) and start fresh
    #[arg(long)]
    reset_db: bool,

    /// Config file to use instead of ~/.config/blogdeck/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Log to a file: the terminal belongs to the TUI.
fn init_tracing(config_dir: &Path) -> Result<()> {
    let log_path = config_dir.join("blogdeck.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Restrict the config directory to the current user.
#[cfg(unix)]
fn restrict_permissions(config_dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(config_dir) {
        Ok(metadata) => {
            let mut perms = metadata.permissions();
            perms.set_mode(0o700);
            if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to set config directory permissions to 0700"
                );
            }
        }
        Err(e) => {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to read config directory metadata"
            );
        }
    }
}

/// Seed articles: the configured catalog file, or the built-in set.
fn load_seed(config: &Config) -> Vec<Article> {
    let Some(path) = &config.catalog else {
        return catalog::builtin();
    };
    match catalog::load_file(path) {
        Ok(articles) => {
            tracing::info!(path = %path.display(), count = articles.len(), "Loaded catalog");
            articles
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Catalog unusable, using built-in articles");
            eprintln!("Warning: {e}. Using built-in articles.");
            catalog::builtin()
        }
    }
}

/// Open the on-disk store. When it cannot be opened, run on a throwaway
/// in-memory store: browsing still works, nothing persists.
async fn open_store(db_path: &Path) -> Result<Store> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;

    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of blogdeck appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(error = %e, path = %db_path.display(), "Local storage unavailable, changes will not be saved");
            eprintln!("Warning: {e}. Changes will not be saved this session.");
            Database::open(":memory:")
                .await
                .context("Failed to open in-memory storage")?
        }
    };
    Ok(Store::new(db))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }
    init_tracing(&config_dir)?;
    #[cfg(unix)]
    restrict_permissions(&config_dir);

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    let db_path = config_dir.join("blog.db");
    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Local store reset.");
    }

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    let seed = load_seed(&config);
    let store = open_store(&db_path).await?;
    let options = BlogOptions {
        recent_limit: config.recent_limit,
        default_theme: config.default_theme(),
    };
    let blog = Blog::open(store, seed, options).await;

    let mut app = App::new(blog, keybindings, config.excerpt_length);
    ui::run(&mut app).await?;

    tracing::info!("Exiting");
    println!("Goodbye!");
    Ok(())
}
