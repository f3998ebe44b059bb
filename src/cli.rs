// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `flowdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flowdag",
    version,
    about = "Run a flow of linked processor nodes from a JSON config.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the flow config file (JSON array of node descriptors).
    #[arg(long, value_name = "PATH", default_value = "flow.json")]
    pub config: String,

    /// Run only up to this node, reusing session state where possible.
    ///
    /// Without it, every node of the flow runs.
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Session id scoping instance reuse across repeated targeted runs.
    #[arg(long, value_name = "ID", default_value = "local")]
    pub session: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLOWDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the nodes, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
