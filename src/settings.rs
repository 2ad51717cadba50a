use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dialogs::{DialogRegistry, DNG_CONVERTER_ALERT};
use crate::ops::ExternalOps;

/// Sub-folder naming scheme applied under the destination directory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubFolderPattern {
    None,
    Custom,
    #[default]
    Yyyymmdd,
    Yymmdd,
    Ddmmyy,
    Ddmm,
    Yyyyddmmm,
    Ddmmmyyyy,
}

impl SubFolderPattern {
    /// chrono format string for the shot-date patterns; `None` for the
    /// patterns that do not derive from a date.
    pub fn date_format(&self) -> Option<&'static str> {
        match self {
            Self::None | Self::Custom => None,
            Self::Yyyymmdd => Some("%Y%m%d"),
            Self::Yymmdd => Some("%y%m%d"),
            Self::Ddmmyy => Some("%d%m%y"),
            Self::Ddmm => Some("%d%m"),
            Self::Yyyyddmmm => Some("%Y%d%b"),
            Self::Ddmmmyyyy => Some("%d%b%Y"),
        }
    }
}

/// JPEG preview embedded in converted DNG files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum JpegPreviewSize {
    None,
    #[default]
    Medium,
    FullSize,
}

impl JpegPreviewSize {
    fn converter_flag(&self) -> &'static str {
        match self {
            Self::None => "-p0",
            Self::Medium => "-p1",
            Self::FullSize => "-p2",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageConversionMethod {
    #[default]
    Preserve,
    Convert,
}

/// The persisted preference document. Unknown keys in the stored file are
/// ignored and missing keys fall back to the field defaults, so there is no
/// schema version to migrate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Destination directory. Empty until the platform default resolves.
    pub location: String,
    pub create_sub_folders_pattern: SubFolderPattern,
    pub custom_sub_folder_name: String,
    pub convert_to_dng: bool,
    pub delete_original: bool,
    pub jpeg_preview_size: JpegPreviewSize,
    pub compressed_lossless: bool,
    pub image_conversion_method: ImageConversionMethod,
    pub embed_original_raw_file: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            location: String::new(),
            create_sub_folders_pattern: SubFolderPattern::default(),
            custom_sub_folder_name: String::new(),
            convert_to_dng: false,
            delete_original: false,
            jpeg_preview_size: JpegPreviewSize::default(),
            compressed_lossless: true,
            image_conversion_method: ImageConversionMethod::default(),
            embed_original_raw_file: false,
        }
    }
}

impl Settings {
    /// Serialize the DNG sub-settings to converter arguments. The flag order
    /// is fixed so identical settings always produce identical strings.
    pub fn dng_args(&self) -> String {
        let mut args: Vec<&str> = Vec::with_capacity(4);
        args.push(if self.compressed_lossless { "-c" } else { "-u" });
        if self.image_conversion_method == ImageConversionMethod::Convert {
            args.push("-l");
        }
        if self.embed_original_raw_file {
            args.push("-e");
        }
        args.push(self.jpeg_preview_size.converter_flag());
        args.join(" ")
    }
}

/// Typed adapter over the single settings document. Loaded once at startup,
/// mutated field by field, flushed to disk on every mutation. A failed flush
/// keeps the in-memory value and logs the divergence.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// `<config dir>/photo-importer/settings.json`.
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("photo-importer").join("settings.json")
    }

    /// Load the document, falling back to defaults when it is missing or
    /// unreadable, then resolve the async platform defaults.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "settings document unparseable, using defaults");
                    Settings::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Settings::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "settings read failed, using defaults");
                Settings::default()
            }
        };

        let mut store = Self { path, settings };
        store.resolve_default_location().await;
        store
    }

    /// The destination default is the platform pictures directory, which is
    /// queried off the control thread so startup never blocks on it.
    async fn resolve_default_location(&mut self) {
        if !self.settings.location.is_empty() {
            return;
        }
        let pictures = tokio::task::spawn_blocking(dirs::picture_dir)
            .await
            .ok()
            .flatten();
        if let Some(dir) = pictures {
            debug!(dir = %dir.display(), "resolved default import location");
            self.settings.location = dir.to_string_lossy().to_string();
            self.flush().await;
        }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn all(&self) -> serde_json::Value {
        serde_json::to_value(&self.settings).unwrap_or(serde_json::Value::Null)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn set_location(&mut self, value: impl Into<String>) {
        self.settings.location = value.into();
        self.flush().await;
    }

    pub async fn set_create_sub_folders_pattern(&mut self, value: SubFolderPattern) {
        self.settings.create_sub_folders_pattern = value;
        self.flush().await;
    }

    pub async fn set_custom_sub_folder_name(&mut self, value: impl Into<String>) {
        self.settings.custom_sub_folder_name = value.into();
        self.flush().await;
    }

    pub async fn set_delete_original(&mut self, value: bool) {
        self.settings.delete_original = value;
        self.flush().await;
    }

    pub async fn set_jpeg_preview_size(&mut self, value: JpegPreviewSize) {
        self.settings.jpeg_preview_size = value;
        self.flush().await;
    }

    pub async fn set_compressed_lossless(&mut self, value: bool) {
        self.settings.compressed_lossless = value;
        self.flush().await;
    }

    pub async fn set_image_conversion_method(&mut self, value: ImageConversionMethod) {
        self.settings.image_conversion_method = value;
        self.flush().await;
    }

    pub async fn set_embed_original_raw_file(&mut self, value: bool) {
        self.settings.embed_original_raw_file = value;
        self.flush().await;
    }

    /// Gated mutation: turning the toggle on requires the DNG converter to be
    /// installed. When the probe fails or errors the field stays unchanged
    /// and the converter alert dialog is opened instead. Returns whether the
    /// new value was applied.
    pub async fn set_convert_to_dng(
        &mut self,
        value: bool,
        ops: &dyn ExternalOps,
        dialogs: &DialogRegistry,
    ) -> bool {
        if value {
            let available = match ops.is_dng_converter_available().await {
                Ok(available) => available,
                Err(err) => {
                    warn!(error = %err, "DNG converter probe failed, treating as unavailable");
                    false
                }
            };
            if !available {
                dialogs.open(DNG_CONVERTER_ALERT);
                return false;
            }
        }
        self.settings.convert_to_dng = value;
        self.flush().await;
        true
    }

    async fn flush(&self) {
        if let Err(err) = self.write_document().await {
            warn!(
                path = %self.path.display(),
                error = %err,
                "settings write failed, in-memory value kept"
            );
        }
    }

    async fn write_document(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let document = serde_json::to_string_pretty(&self.settings)?;
        tokio::fs::write(&self.path, document).await?;
        Ok(())
    }
}
