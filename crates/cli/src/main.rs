//! ticketmerge command-line tool.
//!
//! Checks whether SVN revisions can be merged from a source path into a
//! branch working copy without dragging in other pending tickets, and
//! generates / validates the configuration file it reads.

mod check;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ticketmerge_core::config::{AppConfig, DEFAULT_CONFIG_TOML};
use ticketmerge_core::errors::AnalysisError;

use check::CheckArgs;

const USAGE: &str = "usage: ticketmerge check (--revision=<revision>|--revisions=<revision>,<revision>...) \
--range=<revision>:<revision> [--ignore=<revision>,<revision>] [--show-colliding-files]";

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Ticket-aware SVN merge collision checker.
#[derive(Parser, Debug)]
#[command(
    name = "ticketmerge",
    version,
    about = "Find the pending SVN commits a merge would drag in"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(
        short,
        long,
        global = true,
        default_value = "~/.config/ticketmerge/config.toml"
    )]
    config: String,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check revisions for collisions with other pending commits.
    Check(CheckArgs),

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./ticketmerge.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<AnalysisError>() {
            Some(err) if err.is_usage() => {
                eprintln!("{}", style::error(&err.to_string()));
                eprintln!("{}", USAGE);
                ExitCode::from(2)
            }
            Some(err) => {
                eprintln!("{}", style::error(&err.to_string()));
                ExitCode::FAILURE
            }
            None => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => {
            init_logging(cli.verbose, "warn");
            cmd_init(&output)
        }
        Commands::Validate => {
            init_logging(cli.verbose, "warn");
            cmd_validate(&expand_tilde(&cli.config))
        }
        Commands::Check(args) => {
            let config = load_config(&cli.config)?;
            init_logging(cli.verbose, &config.logging.log_level);
            check::run_check(&config, &args).await
        }
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over both arguments.
fn init_logging(verbose: bool, configured_level: &str) {
    let level = if verbose { "debug" } else { configured_level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn load_config(path: &str) -> Result<AppConfig> {
    let resolved = expand_tilde(path);
    AppConfig::load_and_validate(&resolved).context("failed to load configuration file")
}

/// Expand `~` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, DEFAULT_CONFIG_TOML).context("failed to write config file")?;

    println!("{}", style::success(&format!("Default configuration written to {}", output.display())));
    println!();
    println!("Next steps:");
    println!("  1. Edit the config file with your repository URL, source path and working copy");
    println!(
        "  2. Validate with: ticketmerge validate --config {}",
        output.display()
    );
    println!(
        "  3. Check a revision: ticketmerge check --config {} --range 8000:HEAD --revision 8500",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &str) -> Result<()> {
    println!("Validating configuration: {}", config_path);
    println!();

    let config = AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.validate() {
        Ok(()) => {
            println!("  [OK] All required fields are valid");
        }
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  Repository    : {}", config.svn.repo_url);
    println!("  Source path   : {}", config.svn.source_path);
    println!("  Working copy  : {}", config.svn.working_copy.display());
    println!("  Ignored files : {}", config.merge.ignore_files.len());
    println!("  Ignored revs  : {}", config.merge.ignore_revisions.len());
    println!("  Log level     : {}", config.logging.log_level);

    Ok(())
}
