//! svcs - simple snapshot version control.
//!
//! This is the main entry point for the svcs CLI.

mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use svcs_snapshot::{RepoLayout, SnapshotEngine};
use tracing::debug;

#[derive(Parser)]
#[command(name = "svcs")]
#[command(author, version, about = "Simple snapshot version control", long_about = None)]
struct Cli {
    /// Work-tree root (defaults to the current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Get and set a username.")]
    Config {
        /// New username
        name: Option<String>,
    },
    #[command(about = "Add a file to the index.")]
    Add {
        /// File to track (lists tracked files when omitted)
        path: Option<PathBuf>,
    },
    #[command(about = "Show commit logs.")]
    Log,
    #[command(about = "Save changes.")]
    Commit {
        /// Commit message
        message: Option<String>,
    },
    #[command(about = "Restore a file.")]
    Checkout {
        /// Hash of the commit to restore
        hash: Option<String>,
    },
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    svcs_util::log::init(svcs_util::log::LogConfig::for_verbosity(cli.verbose));

    let Some(command) = cli.command else {
        commands::print_command_list(&Cli::command());
        return Ok(());
    };

    if let Commands::Unknown(args) = &command {
        commands::print_unknown_command(args.first().map(String::as_str).unwrap_or_default());
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let root = match cli.repo {
        Some(repo) => cwd.join(repo),
        None => cwd.clone(),
    };
    let layout = RepoLayout::from_env(root)?;
    debug!(root = %layout.root().display(), metadata = %layout.metadata_dir().display(), "Opened repository");
    let engine = SnapshotEngine::new(layout);

    match command {
        Commands::Config { name } => commands::handle_config(&engine, name.as_deref()),
        Commands::Add { path } => commands::handle_add(&engine, &cwd, path.as_deref()),
        Commands::Log => commands::handle_log(&engine),
        Commands::Commit { message } => commands::handle_commit(&engine, message.as_deref()),
        Commands::Checkout { hash } => commands::handle_checkout(&engine, hash.as_deref()),
        Commands::Unknown(_) => Ok(()),
    }
}
