// Engine module - conversation reconciliation
// Sits between adapter output (types/providers) and whatever renders the history

pub mod dispatch;
pub mod fingerprint;
pub mod graph;
pub mod linearize;
pub mod session;

pub use dispatch::{apply_default_tags, classify_versions, dispatch};
pub use fingerprint::{Fingerprint, fingerprint};
pub use graph::{GraphBuilder, MessageNode, NodeId};
pub use linearize::Linearizer;
pub use session::{MergeSession, merge_files};
