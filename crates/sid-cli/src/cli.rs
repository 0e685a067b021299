use crate::commands::Commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "sid")]
#[command(about = "Persistent user identity for client sessions")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Data directory (defaults to SID_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    pub(crate) data_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    pub(crate) json: bool,
}
