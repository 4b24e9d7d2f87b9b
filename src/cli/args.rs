//! CLI argument definitions using clap
//!
//! No subcommands: running the binary executes the full provisioning
//! sequence. Flags only tune output, never behavior.

use clap::{ArgAction, Parser};

/// Single-host web server provisioning: nginx reverse proxy, Node.js runtime, TLS via certbot
#[derive(Parser, Debug)]
#[command(name = "webstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (repeatable: -d, -d -d, -d -d -d)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,

    /// Print author and version information
    #[arg(long)]
    pub info: bool,

    /// Generate shell completions and exit
    #[arg(long = "generate", value_enum, value_name = "SHELL")]
    pub generator: Option<clap_complete::Shell>,
}
