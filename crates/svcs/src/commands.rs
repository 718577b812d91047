//! Command handlers for the svcs CLI.
//!
//! Validation and state problems are printed as status text and the command
//! still exits successfully. Storage failures are returned as errors.

use std::fmt::Display;
use std::path::Path;
use svcs_snapshot::{SnapshotEngine, SnapshotError, SnapshotResult};

/// Print the outcome, or a non-fatal error as status text.
fn report<T: Display>(result: SnapshotResult<T>) -> anyhow::Result<()> {
    match result {
        Ok(outcome) => println!("{outcome}"),
        Err(e) if !e.is_fatal() => println!("{e}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// List the available commands with their one-line descriptions.
pub fn print_command_list(cli: &clap::Command) {
    println!("These are SVCS commands:");
    for sub in cli.get_subcommands().filter(|s| s.get_name() != "help") {
        let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
        println!("{:<8}  {}", sub.get_name(), about);
    }
}

pub fn print_unknown_command(name: &str) {
    println!("'{name}' is not a SVCS command.");
}

/// Set the username if given, then show the configured one.
pub fn handle_config(engine: &SnapshotEngine, name: Option<&str>) -> anyhow::Result<()> {
    if let Some(name) = name {
        if let Err(e) = engine.identity().set(name) {
            if e.is_fatal() {
                return Err(e.into());
            }
            println!("{e}");
            return Ok(());
        }
    }

    match engine.identity().get()? {
        Some(name) => println!("The username is {name}."),
        None => println!("Please, tell me who you are."),
    }
    Ok(())
}

/// Stage a file, or list staged files when no path is given.
pub fn handle_add(engine: &SnapshotEngine, cwd: &Path, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => report(engine.add(&cwd.join(path)).map_err(|e| match e {
            // Report the path as the user typed it.
            SnapshotError::PathNotFound(_) => SnapshotError::PathNotFound(path.to_path_buf()),
            other => other,
        })),
        None => report(engine.status()),
    }
}

/// Show the commit history, newest first.
pub fn handle_log(engine: &SnapshotEngine) -> anyhow::Result<()> {
    report(engine.history())
}

/// Commit the staged files.
pub fn handle_commit(engine: &SnapshotEngine, message: Option<&str>) -> anyhow::Result<()> {
    match message {
        Some(message) => report(engine.commit(message)),
        None => {
            println!("Message was not passed.");
            Ok(())
        }
    }
}

/// Restore the work tree to a commit.
pub fn handle_checkout(engine: &SnapshotEngine, hash: Option<&str>) -> anyhow::Result<()> {
    match hash {
        Some(hash) => report(engine.restore(hash)),
        None => {
            println!("Commit id was not passed.");
            Ok(())
        }
    }
}
