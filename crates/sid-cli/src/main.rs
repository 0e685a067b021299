//! sid - persistent user identity for client sessions.
//!
//! Each invocation opens the identity store, performs one operation, and
//! exits. The identifier lives in a storage file under the data directory
//! and survives between invocations.
//!
//! # Examples
//!
//! ```bash
//! # Show the current user id
//! sid whoami
//!
//! # Set an id, or mint a fresh one
//! sid set u-1234
//! sid set --generate
//!
//! # Clear the id
//! sid clear
//! ```

mod cli;
mod commands;
mod config;
mod error;
mod logger;

#[cfg(test)]
mod tests;

use crate::cli::Cli;
use crate::commands::Commands;
use crate::config::Settings;

use sid_core::{FileStorage, UserIdentityStore};

use std::process::ExitCode;

use clap::Parser;
use log::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Settings: data dir resolution, optional config.toml, env overrides
    let settings = match Settings::load(cli.data_dir.clone()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = logger::initialize(
        settings.log_level(),
        settings.log_file_path(),
        settings.logging.colored,
    ) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    settings.log_summary();

    let storage = match FileStorage::open(settings.storage_path()) {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to open storage: {e}");
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("{}", e.recovery_hint());
            return ExitCode::FAILURE;
        }
    };

    let mut store = UserIdentityStore::new(storage);

    let expects_user = matches!(cli.command, Commands::Whoami);
    let report = commands::run(cli.command, &mut store);

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing result: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else if let Some(id) = &report.user_id {
        println!("{id}");
    } else if expects_user {
        eprintln!("No user set. Run `sid set <id>` or `sid set --generate`.");
    }

    if expects_user && report.user_id.is_none() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
