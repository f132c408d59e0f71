use anyhow::Result;
use chatweave_providers::get_all_providers;

pub fn list() -> Result<()> {
    println!(
        "{:<13} {:<16} {:<9} DESCRIPTION",
        "FORMAT", "MERGE", "FILES"
    );
    println!("{}", "-".repeat(80));

    for provider in get_all_providers() {
        println!(
            "{:<13} {:<16} {:<9} {}",
            provider.name, provider.merge_mode, provider.file_pattern, provider.description
        );
    }

    Ok(())
}
