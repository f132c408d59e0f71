// Why is the CLI the only crate that touches the filesystem?
// - The engine is pure: same files in, same history out, no I/O
// - Providers only see already-read content plus a path for format probing
// - Grouping files into one merge is the caller's decision, made here from argv

mod args;
mod commands;
pub mod config;
mod handlers;
pub mod input;
pub mod telemetry;
pub mod types;
pub mod views;

pub use args::{Cli, Commands};
pub use commands::run;
