//! file-versioner - version single files inside a git repository
//!
//! # Usage
//! ```bash
//! file-versioner --repo ./notes record journal.txt -m "daily entry"
//! file-versioner --repo ./notes list journal.txt
//! file-versioner --repo ./notes restore <COMMIT> journal.txt
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use file_versioner::{FileVersioner, RemoteConfig, VersionerConfig};

/// Version individual files inside a git repository
#[derive(Parser)]
#[command(name = "file-versioner")]
#[command(about = "Single-file version history on top of git", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the repository root (created if missing)
    #[arg(long, default_value = ".", value_name = "PATH")]
    repo: PathBuf,

    /// Remote URL; enables clone-if-missing and pull-on-open
    #[arg(long, value_name = "URL")]
    remote: Option<String>,

    /// Username for the remote
    #[arg(long, requires = "remote")]
    username: Option<String>,

    /// Environment variable holding the remote password
    #[arg(long, default_value = "FILE_VERSIONER_PASSWORD", value_name = "VAR")]
    password_env: String,

    /// Push automatically after `record`
    #[arg(long, requires = "remote")]
    push: bool,

    /// Author name for commits (needs --author-email)
    #[arg(long, value_name = "NAME", requires = "author_email")]
    author_name: Option<String>,

    /// Author email for commits (needs --author-name)
    #[arg(long, value_name = "EMAIL", requires = "author_name")]
    author_email: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize (or clone) the repository and exit
    Init,
    /// Stage a file, commit it, and push if auto-push is enabled
    Record {
        file: String,
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Stage a file, creating it if missing
    Add { file: String },
    /// Remove a file from the index (and the working tree unless --cached)
    Remove {
        file: String,
        /// Keep the file on disk
        #[arg(long)]
        cached: bool,
    },
    /// Commit staged changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Push the current branch to origin
    Push,
    /// Pull from origin
    Pull,
    /// List the commits that changed a file, newest first
    List {
        file: String,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write the file content at a commit to a side directory
    Restore { commit: String, file: String },
}

fn build_config(cli: &Cli) -> anyhow::Result<VersionerConfig> {
    let mut config = VersionerConfig::new(&cli.repo).auto_push(cli.push);

    if let Some(url) = &cli.remote {
        let password = std::env::var(&cli.password_env)
            .with_context(|| format!("password environment variable {} not set", cli.password_env))?;
        config = config.clone_from(RemoteConfig {
            url: url.clone(),
            username: cli.username.clone().unwrap_or_default(),
            password,
        });
    }

    if let (Some(name), Some(email)) = (&cli.author_name, &cli.author_email) {
        config = config.author(name.as_str(), email.as_str());
    }

    Ok(config)
}

fn run(cli: &Cli, versioner: &FileVersioner) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init => {
            println!("✓ Repository ready at {}", versioner.local_path().display());
        }
        Commands::Record { file, message } => {
            let outcome = versioner.record_version(file, message)?;
            let suffix = if outcome.pushed { " (pushed)" } else { "" };
            println!("✓ Recorded {} as {}{}", file, outcome.commit_id, suffix);
        }
        Commands::Add { file } => {
            versioner.add(file)?;
            println!("✓ Staged {}", file);
        }
        Commands::Remove { file, cached } => {
            versioner.remove(file, *cached)?;
            println!("✓ Removed {}", file);
        }
        Commands::Commit { message } => {
            let oid = versioner.commit(message)?;
            println!("✓ Committed {}", oid);
        }
        Commands::Push => {
            versioner.push()?;
            println!("✓ Pushed to origin");
        }
        Commands::Pull => {
            versioner.pull()?;
            println!("✓ Pulled from origin");
        }
        Commands::List { file, json } => {
            let versions = versioner.list_versions(file)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&versions)?);
            } else {
                for version in &versions {
                    println!("{}  {}  {}", version.timestamp, version.commit_id, version.author);
                }
            }
        }
        Commands::Restore { commit, file } => {
            let path = versioner.materialize_revision(commit, file)?;
            println!("✓ Restored to {}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let versioner = match FileVersioner::open(config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("✗ Failed to open repository: {e}");
            eprintln!("  Path: {}", cli.repo.display());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(&cli, &versioner) {
        eprintln!("✗ {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
