use chatweave_types::{AdapterOutput, DraftMessage, RawMessageEntry, SourceFile, VersionedMessage};
use std::path::Path;

use crate::{Error, Result};

/// Export format recognition
///
/// Responsibilities:
/// - Identify the format from a file name and its content
/// - Stay cheap: probing runs once per registered format for every file
pub trait FormatDetector: Send + Sync {
    /// Unique format ID (e.g., "sillytavern", "gemini", "plain")
    fn id(&self) -> &'static str;

    /// Check if a file is in this format
    fn probe(&self, path: &Path, content: &str) -> ProbeResult;
}

/// Export content extraction
///
/// Responsibilities:
/// - Map a vendor shape onto entries, drafts or versioned messages
/// - Degrade malformed records instead of failing the whole file
pub trait ExportParser: Send + Sync {
    /// Parse one export file's content
    fn parse(&self, source_id: &str, content: &str) -> Result<ParsedExport>;
}

/// Result of parsing one export file
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedExport {
    /// Plain ordered entries, reconciled through the merge graph
    Entries(Vec<RawMessageEntry>),

    /// Messages carrying their own (optional) branch tags
    Tagged(Vec<DraftMessage>),

    /// Turn/version records from a self-describing export
    Versioned(Vec<VersionedMessage>),
}

impl ParsedExport {
    pub fn len(&self) -> usize {
        match self {
            ParsedExport::Entries(entries) => entries.len(),
            ParsedExport::Tagged(drafts) => drafts.len(),
            ParsedExport::Versioned(versions) => versions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn needs_graph(&self) -> bool {
        matches!(self, ParsedExport::Entries(_))
    }
}

/// Combine the parsed files of one merge group into dispatcher input.
///
/// Any number of graph-fed files merge together. Self-describing exports carry
/// their own branch structure and are dispatched one file at a time.
pub fn into_adapter_output(parsed: Vec<(String, ParsedExport)>) -> Result<AdapterOutput> {
    let mut files = Vec::new();
    let mut described = Vec::new();

    for (source_id, export) in parsed {
        match export {
            ParsedExport::Entries(entries) => files.push(SourceFile::new(source_id, entries)),
            ParsedExport::Tagged(drafts) => described.push(AdapterOutput::Tagged(drafts)),
            ParsedExport::Versioned(versions) => described.push(AdapterOutput::Versioned(versions)),
        }
    }

    let total = files.len() + described.len();
    match described.pop() {
        None => Ok(AdapterOutput::Graph(files)),
        Some(output) if total == 1 => Ok(output),
        Some(_) => Err(Error::Provider(format!(
            "{} files given, but only graph-fed formats can be merged together",
            total
        ))),
    }
}

// --- Helper types ---

/// Probe result with confidence score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeResult {
    /// Format can handle this file with given confidence (0.0 - 1.0)
    Confidence(f32),
    /// Format cannot handle this file
    NoMatch,
}

impl ProbeResult {
    /// Create high confidence match (1.0)
    pub fn match_high() -> Self {
        ProbeResult::Confidence(1.0)
    }

    /// Create medium confidence match (0.5)
    pub fn match_medium() -> Self {
        ProbeResult::Confidence(0.5)
    }

    /// Create low confidence match (0.3)
    pub fn match_low() -> Self {
        ProbeResult::Confidence(0.3)
    }

    /// Check if this is a match (confidence > 0)
    pub fn is_match(&self) -> bool {
        matches!(self, ProbeResult::Confidence(c) if *c > 0.0)
    }

    /// Get confidence score (0.0 if NoMatch)
    pub fn confidence(&self) -> f32 {
        match self {
            ProbeResult::Confidence(c) => *c,
            ProbeResult::NoMatch => 0.0,
        }
    }
}

// --- Provider Adapter ---

/// Adapter that bundles detection and parsing for one export format
pub struct ProviderAdapter {
    pub detector: Box<dyn FormatDetector>,
    pub parser: Box<dyn ExportParser>,
}

impl ProviderAdapter {
    pub fn new(detector: Box<dyn FormatDetector>, parser: Box<dyn ExportParser>) -> Self {
        Self { detector, parser }
    }

    /// Create adapter for a format by name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "sillytavern" | "st" => Ok(Self::sillytavern()),
            "gemini" => Ok(Self::gemini()),
            "plain" => Ok(Self::plain()),
            _ => Err(Error::Provider(format!("Unknown format: {}", name))),
        }
    }

    /// SillyTavern-style JSONL chat export (graph-fed)
    pub fn sillytavern() -> Self {
        Self::new(
            Box::new(crate::sillytavern::SillyTavernDetector),
            Box::new(crate::sillytavern::SillyTavernParser),
        )
    }

    /// Gemini multi-version export (self-describing)
    pub fn gemini() -> Self {
        Self::new(
            Box::new(crate::gemini::GeminiDetector),
            Box::new(crate::gemini::GeminiParser),
        )
    }

    /// Pre-tagged JSON message array
    pub fn plain() -> Self {
        Self::new(
            Box::new(crate::plain::PlainDetector),
            Box::new(crate::plain::PlainParser),
        )
    }

    /// Get format ID
    pub fn id(&self) -> &'static str {
        self.detector.id()
    }

    /// Parse already-loaded content without probing
    pub fn parse(&self, source_id: &str, content: &str) -> Result<ParsedExport> {
        self.parser.parse(source_id, content)
    }
}
