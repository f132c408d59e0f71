//! Export-format adapters for chatweave
//!
//! Each format pairs a [`FormatDetector`] with an [`ExportParser`] inside a
//! [`ProviderAdapter`]. Graph-fed formats yield plain entries for the merge
//! graph; self-describing formats yield tagged or versioned messages.

pub mod error;
pub mod gemini;
pub mod plain;
pub mod registry;
pub mod sillytavern;
pub mod traits;
pub mod util;

pub use error::{Error, Result};
pub use registry::{
    ProviderMetadata, create_adapter, create_all_adapters, detect_adapter, get_all_providers,
    get_provider_metadata, get_provider_names,
};
pub use traits::{
    ExportParser, FormatDetector, ParsedExport, ProbeResult, ProviderAdapter, into_adapter_output,
};
