use std::path::Path;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::OpError;
use crate::models::{is_raw_file, SourceFile};

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .path()
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk a volume and collect its RAW files. Hidden entries and directories
/// are skipped; an unreadable entry is skipped rather than failing the
/// listing.
pub(super) fn collect_raw_files(root: &Path) -> Result<Vec<SourceFile>, OpError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !is_hidden(e))
        .filter(|e| !e.file_type().is_dir())
    {
        let path = entry.path().display().to_string();
        if !is_raw_file(&path) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                debug!(path, error = %err, "skipping unreadable entry");
                continue;
            }
        };
        files.push(SourceFile {
            path,
            is_directory: false,
            size_bytes: Some(metadata.len()),
        });
    }
    Ok(files)
}
