use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OpError;
use crate::models::{PreviewResult, SourceFile, VolumeDescriptor};
use crate::settings::SubFolderPattern;

/// Input of the bulk copy/convert operation. Built once per user-triggered
/// import from the selection set and the persisted settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Absolute original paths, in published result order.
    pub sources: Vec<String>,
    pub destination: String,
    pub convert_to_dng: bool,
    pub delete_original: bool,
    /// Serialized DNG converter arguments; present only when converting.
    pub dng_args: Option<String>,
    pub sub_folder_pattern: SubFolderPattern,
    /// Sub-folder name used when the pattern is `custom`.
    pub custom_sub_folder_name: String,
}

/// The external operations this core orchestrates. Each call is a single-shot
/// request with one terminal response; internals (filesystem walking, the
/// thumbnail extractor, the DNG converter) live behind this boundary.
#[async_trait]
pub trait ExternalOps: Send + Sync {
    /// Current set of mounted volumes.
    async fn list_volumes(&self) -> Result<Vec<VolumeDescriptor>, OpError>;

    /// Candidate RAW files on one volume.
    async fn list_files(&self, mount_point: &str) -> Result<Vec<SourceFile>, OpError>;

    /// Derive a preview artifact and content hash for one source file.
    async fn extract_preview(&self, path: &str) -> Result<PreviewResult, OpError>;

    /// Probe for the Adobe DNG Converter. Callers treat an error as `false`.
    async fn is_dng_converter_available(&self) -> Result<bool, OpError>;

    /// Bulk copy/convert of the selected files. Called exactly once per
    /// import action; partial-failure semantics are the operation's own.
    async fn copy_or_convert(&self, request: &ImportRequest) -> Result<(), OpError>;

    /// Fire-and-forget open of an external URL.
    async fn open_url(&self, url: &str) -> Result<(), OpError>;
}
