//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Plays the Game node of a saved scene graph without the editor.
#[derive(Debug, Parser)]
#[command(name = "shapez-cli", version, long_about = None)]
pub struct Args {
    /// Project file written by the editor
    pub graph: PathBuf,

    /// Pass limit for this run (overrides SHAPEZ_MAX_PASSES)
    pub passes: Option<u64>,

    /// Key codes held during every pass, comma-separated
    #[arg(long, env = "SHAPEZ_KEYS", value_delimiter = ',')]
    pub keys: Vec<u16>,
}
