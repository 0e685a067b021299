use sid_core::{KeyValueStorage, UserIdentityStore};

use clap::Subcommand;
use log::info;
use serde::Serialize;
use uuid::Uuid;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the current user id (fails if none is set)
    Whoami,

    /// Set the current user id
    Set {
        /// The identifier to store
        #[arg(required_unless_present = "generate")]
        id: Option<String>,

        /// Mint a random UUID as the identifier
        #[arg(long, conflicts_with = "id")]
        generate: bool,
    },

    /// Clear the current user id
    Clear,
}

/// Outcome of one CLI operation, shaped for plain and JSON output.
///
/// Serializes with the same key the store persists under, so `--json`
/// output mirrors the storage file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdentityReport {
    pub(crate) user_id: Option<String>,
}

/// Apply one command to the store and report the resulting identity.
pub(crate) fn run<S: KeyValueStorage>(
    command: Commands,
    store: &mut UserIdentityStore<S>,
) -> IdentityReport {
    match command {
        Commands::Whoami => {}

        Commands::Set { id, generate } => {
            let id = match (id, generate) {
                (_, true) => Uuid::new_v4().to_string(),
                (Some(id), false) => id,
                (None, false) => unreachable!("clap enforces id unless --generate"),
            };

            info!("Setting user id: {id}");
            store.set_user_id(Some(id));
        }

        Commands::Clear => {
            info!("Clearing user id");
            store.set_user_id(None);
        }
    }

    IdentityReport {
        user_id: store.user_id().map(str::to_owned),
    }
}
