//! `lineage` — build and query the script lineage knowledge base.
//!
//! # Usage
//!
//! ```
//! lineage load --force --verify
//! lineage query "Get Character Ancestors" ᚠ
//! lineage --config ~/lineage.toml query Total --json
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lineage_loader::{Database, LineageConfig, LoadOptions};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Script lineage knowledge base")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "lineage.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Rebuild the knowledge base from the resource directory.
  Load {
    /// Delete the store file first.
    #[arg(long)]
    force:     bool,
    /// Fail on inconsistent source data.
    #[arg(long)]
    verify:    bool,
    /// Print the coverage audit and derivation statistics.
    #[arg(long)]
    debug:     bool,
    /// Resource directory, overriding the configured one.
    #[arg(long, value_name = "DIR")]
    resources: Option<PathBuf>,
    /// Saved-query directory, overriding the configured one.
    #[arg(long, value_name = "DIR")]
    queries:   Option<PathBuf>,
  },
  /// Run a saved query, named by a unique prefix of its file name.
  Query {
    name:   String,
    /// Positional parameters bound to `?1`, `?2`, ...
    params: Vec<String>,
    /// Print rows as JSON instead of a table.
    #[arg(long)]
    json:   bool,
  },
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LINEAGE"))
    .build()
    .context("failed to read config file")?;

  let config: LineageConfig = settings
    .try_deserialize()
    .context("failed to deserialise LineageConfig")?;

  let mut db = Database::open(&config)
    .with_context(|| format!("failed to open store at {:?}", config.store_path))?;

  match cli.command {
    Command::Load { force, verify, debug, resources, queries } => {
      let options = LoadOptions {
        force_overwrite: force,
        verify,
        debug,
        resource_path: resources,
        query_path: queries,
      };
      let report = db.load(&options).context("load failed")?;
      if debug {
        print!("{}", db.debug_report(&report)?);
      }
      tracing::info!(
        scripts = report.scripts,
        code_points = report.code_points,
        edges = report.edges,
        "knowledge base ready"
      );
    }
    Command::Query { name, params, json } => {
      if json {
        let result = db.saved_query(&name, &params)?;
        println!("{}", serde_json::to_string_pretty(&result.rows)?);
      } else {
        print!("{}", db.pretty_saved_query(&name, &params)?);
      }
    }
  }

  Ok(())
}
