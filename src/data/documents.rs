//! Document discovery, reading and result persistence.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{ExtractError, Result};

/// Collect files under `root` whose extension is in `extensions`, sorted by path.
pub fn discover(root: &Path, extensions: &[String], recursive: bool) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 });
    let mut paths: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, extensions))
        .collect();
    paths.sort();
    info!(root = %root.display(), documents = paths.len(), "discovered documents");
    paths
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Identifier used for a document: its file name.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// `<output_dir>/<sub-folders>/<file name>_medications.json`.
///
/// Sub-folders mirror the document's location under `input_root`, and the
/// file name keeps its extension, so `note.html` and `note.txt` (or two
/// `note.html` files in different folders) never share an output file.
pub fn output_path(output_dir: &Path, input_root: &Path, document: &Path) -> PathBuf {
    let (sub_dir, file_name) = match document.strip_prefix(input_root) {
        Ok(relative) => (relative.parent(), relative.file_name()),
        Err(_) => (None, document.file_name()),
    };
    let name = file_name
        .and_then(|name| name.to_str())
        .unwrap_or("document");
    let dir = match sub_dir {
        Some(sub_dir) if !sub_dir.as_os_str().is_empty() => output_dir.join(sub_dir),
        _ => output_dir.to_path_buf(),
    };
    dir.join(format!("{name}_medications.json"))
}

/// Pretty-print `value` as JSON to `path`, creating parent directories.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    let write_err = |source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, body).await.map_err(write_err)?;
    Ok(())
}
