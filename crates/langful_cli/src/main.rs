//! langful CLI
//!
//! Usage:
//!   langful list
//!   langful get <key>
//!   langful set <key> <value> [--int]
//!   langful remove <key>
//!   langful render <key> <args>...
//!   langful expand <text>
//!   langful convert <locale> --to <json|lang> [--out <dir>]
//!   langful export <dir>

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use langful::{Format, LangfulConfig, CONFIG_FILE};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "langful")]
#[command(author, version, about = "Inspect, edit, and convert localization catalogs", long_about = None)]
struct Cli {
    /// Catalog directory (overrides the config file)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Config file, or a directory containing langful.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Locale to use instead of the system/default locale
    #[arg(short, long, global = true)]
    locale: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List loaded locales
    List,

    /// Print the value of a key
    Get { key: String },

    /// Set a key and save the catalog
    Set {
        key: String,
        value: String,

        /// Store the value as an integer
        #[arg(long)]
        int: bool,
    },

    /// Remove a key and save the catalog
    Remove { key: String },

    /// Fill a template's placeholders with positional arguments
    Render {
        key: String,

        #[arg(required = true)]
        args: Vec<String>,
    },

    /// Replace `%key%` references in text with catalog values
    Expand { text: String },

    /// Write a locale in another format
    Convert {
        locale: String,

        /// Target format (json or lang)
        #[arg(long)]
        to: Format,

        /// Output directory (defaults to the locale's own directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Save every locale into a directory
    Export { dir: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = resolve_config(cli.config.as_deref(), cli.dir, cli.locale)?;
    let mut store = commands::open_store(&config)?;

    match cli.command {
        Commands::List => commands::list(&store),
        Commands::Get { key } => commands::get(&store, &key),
        Commands::Set { key, value, int } => commands::set(&mut store, key, &value, int),
        Commands::Remove { key } => commands::remove(&mut store, &key),
        Commands::Render { key, args } => commands::render(&store, &key, &args),
        Commands::Expand { text } => commands::expand(&store, &text),
        Commands::Convert { locale, to, out } => {
            commands::convert(&store, &locale, to, out.as_deref())
        }
        Commands::Export { dir } => commands::export(&store, &dir),
    }
}

/// Config file (explicit, or `./langful.toml` when present), then CLI overrides.
fn resolve_config(
    path: Option<&Path>,
    dir: Option<PathBuf>,
    locale: Option<String>,
) -> Result<LangfulConfig> {
    let mut config = match path {
        Some(path) => LangfulConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if Path::new(CONFIG_FILE).is_file() => LangfulConfig::load(Path::new(CONFIG_FILE))
            .with_context(|| format!("Failed to load {CONFIG_FILE}"))?,
        None => LangfulConfig::default(),
    };

    if let Some(dir) = dir {
        config.path = Some(dir);
    }
    if let Some(locale) = locale {
        config.locale = Some(locale);
    }
    Ok(config)
}
