use anyhow::Result;
use chatweave_engine::dispatch;
use chatweave_providers::into_adapter_output;
use std::path::PathBuf;
use tracing::info;

use crate::input::load_files;
use crate::types::{InputFormat, OutputMode};
use crate::views;

pub fn handle(
    paths: &[PathBuf],
    format: InputFormat,
    output: OutputMode,
    pretty: bool,
) -> Result<()> {
    let loaded = load_files(paths, format)?;
    let file_names: Vec<String> = loaded.iter().map(|f| f.source_id.clone()).collect();

    let adapter_output =
        into_adapter_output(loaded.into_iter().map(|f| (f.source_id, f.parsed)).collect())?;
    let result = dispatch(adapter_output, &file_names);

    info!(
        files = result.metadata.total_files,
        messages = result.history.len(),
        branches = result.metadata.stats.branch_count,
        "merged"
    );

    match output {
        OutputMode::Json if pretty => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputMode::Json => println!("{}", serde_json::to_string(&result)?),
        OutputMode::Timeline => println!("{}", views::timeline(&result)),
    }

    Ok(())
}
