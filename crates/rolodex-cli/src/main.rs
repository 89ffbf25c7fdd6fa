//! `rolodex` — interactive personal contact directory.
//!
//! # Usage
//!
//! ```
//! rolodex
//! rolodex --store ~/contacts.db --json
//! rolodex --config ~/.config/rolodex/rolodex.toml
//! ```
//!
//! The address book is loaded once at startup and written back on `close`,
//! `exit`, or end of input.

mod app;
mod commands;
mod error;
mod render;

use std::{
  io::{self, IsTerminal as _},
  path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use app::{App, OutputOptions};
use clap::Parser;
use rolodex_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rolodex", version, about = "Personal contact directory")]
struct Args {
  /// Path to a TOML config file (store_path, json, color).
  #[arg(short, long, value_name = "FILE", default_value = "rolodex.toml")]
  config: PathBuf,

  /// Address book file; overrides `store_path` from the config.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Print list replies as JSON.
  #[arg(long)]
  json: bool,

  /// Disable colored output.
  #[arg(long)]
  no_color: bool,
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Settings merged from defaults, the config file, and `ROLODEX_*` variables.
#[derive(Deserialize, Debug)]
struct Settings {
  store_path: PathBuf,
  json:       bool,
  color:      bool,
}

fn load_settings(path: &Path) -> Result<Settings> {
  config::Config::builder()
    .set_default("store_path", "addressbook.db")?
    .set_default("json", false)?
    .set_default("color", true)?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("ROLODEX"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise settings")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let settings = load_settings(&args.config)?;

  // CLI flags override the config file, which overrides defaults.
  let store_path = expand_tilde(args.store.as_deref().unwrap_or(settings.store_path.as_path()));
  let options = OutputOptions {
    json:  args.json || settings.json,
    color: settings.color && !args.no_color && io::stdout().is_terminal(),
  };
  tracing::debug!(?settings, store = %store_path.display(), "starting");

  let mut app = App::load(SqliteStore::new(&store_path), options)
    .with_context(|| format!("failed to open address book at {store_path:?}"))?;

  let stdin = io::stdin();
  let mut stdout = io::stdout();
  app.print_banner(&mut stdout)?;
  app.run(stdin.lock(), &mut stdout)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
