use anyhow::{Context, Result, bail};
use chatweave_providers::{ParsedExport, ProviderAdapter, create_adapter, detect_adapter};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::types::InputFormat;

/// One input file after reading and parsing
pub struct LoadedFile {
    pub path: PathBuf,
    pub source_id: String,
    pub format: &'static str,
    pub parsed: ParsedExport,
}

/// Expand the given paths into files, keeping argument order.
///
/// Directories contribute every file beneath them, sorted by name.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory: {}", path.display()))?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }

    if files.is_empty() {
        bail!("No input files found");
    }
    Ok(files)
}

/// Name a file is known by inside the merge (file name, else full path)
pub fn source_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and parse every file, detecting the format per file unless one was
/// forced.
pub fn load_files(paths: &[PathBuf], format: InputFormat) -> Result<Vec<LoadedFile>> {
    let forced: Option<ProviderAdapter> = format.adapter_name().map(create_adapter).transpose()?;

    let mut loaded = Vec::new();
    for path in collect_files(paths)? {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;

        let detected;
        let adapter = match &forced {
            Some(adapter) => adapter,
            None => {
                detected = detect_adapter(&path, &content)?;
                &detected
            }
        };

        let source_id = source_id(&path);
        let parsed = adapter
            .parse(&source_id, &content)
            .with_context(|| format!("Failed to parse {} as {}", path.display(), adapter.id()))?;

        debug!(file = %path.display(), format = adapter.id(), records = parsed.len(), "loaded");
        loaded.push(LoadedFile {
            path,
            source_id,
            format: adapter.id(),
            parsed,
        });
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directories_expand_sorted() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(temp_dir.path().join("b.jsonl"), "")?;
        std::fs::write(temp_dir.path().join("a.jsonl"), "")?;
        std::fs::write(nested.join("c.jsonl"), "")?;

        let files = collect_files(&[temp_dir.path().to_path_buf()])?;
        let names: Vec<String> = files.iter().map(|p| source_id(p)).collect();
        assert_eq!(names, vec!["a.jsonl", "b.jsonl", "c.jsonl"]);
        Ok(())
    }

    #[test]
    fn test_argument_order_is_kept() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let a = temp_dir.path().join("a.jsonl");
        let b = temp_dir.path().join("b.jsonl");
        std::fs::write(&a, "")?;
        std::fs::write(&b, "")?;

        let files = collect_files(&[b.clone(), a.clone()])?;
        assert_eq!(files, vec![b, a]);
        Ok(())
    }

    #[test]
    fn test_missing_path_fails() {
        assert!(collect_files(&[PathBuf::from("/nonexistent/chat.jsonl")]).is_err());
    }

    #[test]
    fn test_forced_format_skips_detection() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("chat.txt");
        std::fs::write(&path, "{\"name\":\"Aria\",\"is_user\":false,\"mes\":\"hi\"}\n")?;

        let loaded = load_files(&[path], InputFormat::Sillytavern)?;
        assert_eq!(loaded[0].format, "sillytavern");
        assert_eq!(loaded[0].parsed.len(), 1);
        Ok(())
    }
}
