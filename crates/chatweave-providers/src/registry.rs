use crate::traits::ProviderAdapter;
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: &'static str,
    pub description: &'static str,
    /// "graph" for formats reconciled through the merge graph,
    /// "self-describing" for formats that carry their own branch structure
    pub merge_mode: &'static str,
    pub file_pattern: &'static str,
}

const PROVIDERS: &[ProviderMetadata] = &[
    ProviderMetadata {
        name: "sillytavern",
        description: "SillyTavern-style JSONL chat export",
        merge_mode: "graph",
        file_pattern: "*.jsonl",
    },
    ProviderMetadata {
        name: "gemini",
        description: "Gemini multi-version conversation export",
        merge_mode: "self-describing",
        file_pattern: "*.json",
    },
    ProviderMetadata {
        name: "plain",
        description: "JSON array of pre-tagged messages",
        merge_mode: "self-describing",
        file_pattern: "*.json",
    },
];

pub fn get_all_providers() -> &'static [ProviderMetadata] {
    PROVIDERS
}

pub fn get_provider_names() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.name).collect()
}

pub fn get_provider_metadata(name: &str) -> Option<&'static ProviderMetadata> {
    PROVIDERS.iter().find(|p| p.name == name)
}

/// Create a provider adapter by name
pub fn create_adapter(name: &str) -> Result<ProviderAdapter> {
    ProviderAdapter::from_name(name)
}

/// Create all provider adapters, in registry order
pub fn create_all_adapters() -> Vec<ProviderAdapter> {
    vec![
        ProviderAdapter::sillytavern(),
        ProviderAdapter::gemini(),
        ProviderAdapter::plain(),
    ]
}

/// Pick the adapter whose probe is most confident about this file.
///
/// Ties go to the adapter registered first.
pub fn detect_adapter(path: &Path, content: &str) -> Result<ProviderAdapter> {
    let mut best: Option<(f32, ProviderAdapter)> = None;

    for adapter in create_all_adapters() {
        let confidence = adapter.detector.probe(path, content).confidence();
        debug!(file = %path.display(), format = adapter.id(), confidence, "probed");
        if confidence <= 0.0 {
            continue;
        }
        if best.as_ref().is_none_or(|(top, _)| confidence > *top) {
            best = Some((confidence, adapter));
        }
    }

    best.map(|(_, adapter)| adapter).ok_or_else(|| {
        Error::Provider(format!("Cannot detect export format of: {}", path.display()))
    })
}
