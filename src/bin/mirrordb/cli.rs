use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Minimal CLI for MirrorDB
#[derive(Parser, Debug)]
#[command(name = "mirrordb", version, about = "MirrorDB snapshot mirror CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Watch a reference and keep the local mirror converged (daemon)
    Watch {
        /// Snapshot reference: /ipns/<name> or /ipfs/<id>
        #[arg(long = "ref")]
        reference: String,
        /// Local store root (M1_STORE_DIR overrides the default)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Run a single resolve + load + synchronize pass
    Sync {
        /// Snapshot reference: /ipns/<name> or /ipfs/<id>
        #[arg(long = "ref")]
        reference: String,
        /// Local store root (M1_STORE_DIR overrides the default)
        #[arg(long)]
        store: Option<PathBuf>,
        /// JSON report (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve a reference and print the snapshot id
    Resolve {
        /// Snapshot reference: /ipns/<name> or /ipfs/<id>
        #[arg(long = "ref")]
        reference: String,
    },
    /// Print local mirror state for a database name
    Status {
        /// Database name (namespace under the store root)
        #[arg(long)]
        name: String,
        /// Local store root (M1_STORE_DIR overrides the default)
        #[arg(long)]
        store: Option<PathBuf>,
        /// JSON output (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
