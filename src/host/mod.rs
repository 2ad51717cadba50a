mod convert;
mod exif;
mod hash;
mod listing;
mod probe;
mod thumbnail;
mod volumes;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::OpError;
use crate::models::{PreviewResult, SourceFile, VolumeDescriptor};
use crate::ops::{ExternalOps, ImportRequest};

pub use hash::hash_file;

/// Production implementation of the external operations against the local
/// machine: volume scanning, RAW listing, exiftool thumbnail extraction with
/// an on-disk cache, and the Adobe DNG Converter for the bulk convert path.
pub struct HostOps {
    thumbnail_dir: PathBuf,
}

impl HostOps {
    /// Thumbnails land in `<cache dir>/photo-importer/thumbnails`.
    pub fn new() -> Self {
        let base = dirs::cache_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            thumbnail_dir: base.join("photo-importer").join("thumbnails"),
        }
    }

    pub fn with_thumbnail_dir(thumbnail_dir: impl Into<PathBuf>) -> Self {
        Self {
            thumbnail_dir: thumbnail_dir.into(),
        }
    }

    pub fn thumbnail_dir(&self) -> &Path {
        &self.thumbnail_dir
    }
}

impl Default for HostOps {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExternalOps for HostOps {
    async fn list_volumes(&self) -> Result<Vec<VolumeDescriptor>, OpError> {
        tokio::task::spawn_blocking(volumes::scan_volumes)
            .await
            .map_err(|err| OpError::Other(format!("volume scan panicked: {err}")))
    }

    async fn list_files(&self, mount_point: &str) -> Result<Vec<SourceFile>, OpError> {
        let root = PathBuf::from(mount_point);
        if !root.exists() {
            return Err(OpError::PathNotFound(root));
        }
        tokio::task::spawn_blocking(move || listing::collect_raw_files(&root))
            .await
            .map_err(|err| OpError::Other(format!("listing panicked: {err}")))?
    }

    async fn extract_preview(&self, path: &str) -> Result<PreviewResult, OpError> {
        thumbnail::extract(&self.thumbnail_dir, Path::new(path)).await
    }

    async fn is_dng_converter_available(&self) -> Result<bool, OpError> {
        probe::is_dng_converter_available().await
    }

    async fn copy_or_convert(&self, request: &ImportRequest) -> Result<(), OpError> {
        convert::run(request).await
    }

    async fn open_url(&self, url: &str) -> Result<(), OpError> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || webbrowser::open(&url))
            .await
            .map_err(|err| OpError::Other(format!("browser open panicked: {err}")))?
            .map_err(OpError::Io)
    }
}
