use crate::types::{InputFormat, LogLevel, OutputMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chatweave")]
#[command(about = "Merge overlapping chat exports into one branch-aware timeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $CHATWEAVE_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for stderr diagnostics (overrides RUST_LOG and the config file)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge export files into one history
    Merge {
        /// Files or directories; directories are searched recursively
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Input format (default: from config, else auto-detect per file)
        #[arg(long)]
        format: Option<InputFormat>,

        /// Output mode (default: from config, else json)
        #[arg(long)]
        output: Option<OutputMode>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the merge graph's true roots
    Roots {
        /// Files or directories of graph-fed exports
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Input format (default: from config, else auto-detect per file)
        #[arg(long)]
        format: Option<InputFormat>,
    },

    /// List supported export formats
    Providers,
}
