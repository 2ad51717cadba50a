pub mod media;

use serde::{Deserialize, Serialize};

pub use media::{is_raw_file, RAW_EXTENSIONS};

/// One entry of a volume listing. Immutable once produced; `path` is only
/// unique within a single listing of a volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub path: String,
    pub is_directory: bool,
    pub size_bytes: Option<u64>,
}

impl SourceFile {
    pub fn file(path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
            size_bytes: Some(size_bytes),
        }
    }
}

/// A successfully extracted preview. `content_hash` is the canonical identity
/// for selection and list diffing: paths repeat across relistings of the same
/// volume, content hashes do not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub original_path: String,
    pub thumbnail_path: String,
    pub content_hash: String,
}

/// A mounted volume as reported by the host. Transient, re-fetched on demand,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDescriptor {
    pub mount_point: String,
    pub display_name: String,
    pub is_removable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_file_constructor_marks_files() {
        let f = SourceFile::file("/Volumes/SD1/DCIM/a.arw", 1024);
        assert!(!f.is_directory);
        assert_eq!(f.size_bytes, Some(1024));
    }

    #[test]
    fn preview_result_serializes_camel_case() {
        let r = PreviewResult {
            original_path: "/Volumes/SD1/DCIM/a.arw".into(),
            thumbnail_path: "/tmp/thumbs/a_1234.jpg".into(),
            content_hash: "1234".into(),
        };
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("originalPath"));
        assert!(json.contains("contentHash"));
    }
}
