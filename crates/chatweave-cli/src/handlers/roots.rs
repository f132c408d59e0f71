use anyhow::{Result, bail};
use chatweave_engine::MergeSession;
use chatweave_providers::ParsedExport;
use chatweave_types::SourceFile;
use std::path::PathBuf;

use crate::input::load_files;
use crate::types::InputFormat;
use crate::views::preview;

pub fn handle(paths: &[PathBuf], format: InputFormat) -> Result<()> {
    let loaded = load_files(paths, format)?;

    let mut session = MergeSession::new();
    let mut file_names = Vec::new();
    for file in loaded {
        let ParsedExport::Entries(entries) = file.parsed else {
            bail!(
                "{} is a {} export; roots only applies to graph-fed formats",
                file.path.display(),
                file.format
            );
        };
        session.add_file(&SourceFile::new(file.source_id.clone(), entries));
        file_names.push(file.source_id);
    }

    let graph = session.graph();
    let roots = graph.find_true_roots();

    println!("nodes: {}", graph.node_count());
    println!("roots: {}", roots.len());

    for node in graph.nodes().filter(|n| roots.contains(&n.fingerprint)) {
        let origins: Vec<&str> = node
            .origin_files
            .iter()
            .filter_map(|i| file_names.get(*i).map(String::as_str))
            .collect();
        println!(
            "  {}: {} ({})",
            node.entry.role().as_str(),
            preview(node.entry.content_or_empty(), 60),
            origins.join(", ")
        );
    }

    Ok(())
}
