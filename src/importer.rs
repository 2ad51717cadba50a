use std::sync::Arc;

use tracing::{error, info};

use crate::error::OpError;
use crate::models::PreviewResult;
use crate::ops::{ExternalOps, ImportRequest};
use crate::selection::SelectionSet;
use crate::settings::Settings;

/// Dispatches one bulk copy/convert call per user-triggered import and
/// reports a single terminal outcome for the whole batch. Partial-failure
/// handling inside the bulk operation is its own concern.
pub struct ImportDispatcher {
    ops: Arc<dyn ExternalOps>,
}

/// Build the bulk request from the published results, the selection and the
/// persisted settings. Sources are original paths (never thumbnail paths) in
/// published order; the DNG argument string is attached only when converting.
pub fn build_request(
    published: &[PreviewResult],
    selection: &SelectionSet,
    settings: &Settings,
) -> ImportRequest {
    let sources: Vec<String> = published
        .iter()
        .filter(|r| selection.is_selected(&r.content_hash))
        .map(|r| r.original_path.clone())
        .collect();

    ImportRequest {
        sources,
        destination: settings.location.clone(),
        convert_to_dng: settings.convert_to_dng,
        delete_original: settings.delete_original,
        dng_args: settings.convert_to_dng.then(|| settings.dng_args()),
        sub_folder_pattern: settings.create_sub_folders_pattern,
        custom_sub_folder_name: settings.custom_sub_folder_name.clone(),
    }
}

impl ImportDispatcher {
    pub fn new(ops: Arc<dyn ExternalOps>) -> Self {
        Self { ops }
    }

    pub async fn dispatch(
        &self,
        published: &[PreviewResult],
        selection: &SelectionSet,
        settings: &Settings,
    ) -> Result<(), OpError> {
        let request = build_request(published, selection, settings);
        if request.sources.is_empty() {
            info!("import requested with empty selection, nothing to do");
            return Ok(());
        }

        info!(
            files = request.sources.len(),
            destination = %request.destination,
            convert_to_dng = request.convert_to_dng,
            delete_original = request.delete_original,
            "dispatching import"
        );

        match self.ops.copy_or_convert(&request).await {
            Ok(()) => {
                info!(files = request.sources.len(), "import finished");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "import failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ImageConversionMethod, JpegPreviewSize, SubFolderPattern};

    fn preview(path: &str, hash: &str) -> PreviewResult {
        PreviewResult {
            original_path: path.to_string(),
            thumbnail_path: format!("/tmp/thumbs/{hash}.jpg"),
            content_hash: hash.to_string(),
        }
    }

    #[test]
    fn request_resolves_selection_to_original_paths_in_published_order() {
        let published = vec![
            preview("/sd/a.arw", "ha"),
            preview("/sd/b.arw", "hb"),
            preview("/sd/c.arw", "hc"),
        ];
        let selection = SelectionSet::new();
        // Select c before a; published order must still win.
        selection.add(&published[2]);
        selection.add(&published[0]);

        let settings = Settings {
            location: "/Users/andy/Pictures".into(),
            ..Settings::default()
        };
        let request = build_request(&published, &selection, &settings);

        assert_eq!(request.sources, vec!["/sd/a.arw", "/sd/c.arw"]);
        assert_eq!(request.destination, "/Users/andy/Pictures");
        assert!(!request.convert_to_dng);
        assert_eq!(request.dng_args, None);
    }

    #[test]
    fn request_carries_dng_args_only_when_converting() {
        let published = vec![preview("/sd/a.arw", "ha")];
        let selection = SelectionSet::new();
        selection.add(&published[0]);

        let settings = Settings {
            location: "/dest".into(),
            convert_to_dng: true,
            delete_original: true,
            compressed_lossless: true,
            embed_original_raw_file: true,
            jpeg_preview_size: JpegPreviewSize::FullSize,
            image_conversion_method: ImageConversionMethod::Preserve,
            create_sub_folders_pattern: SubFolderPattern::Ddmm,
            ..Settings::default()
        };
        let request = build_request(&published, &selection, &settings);

        assert!(request.convert_to_dng);
        assert!(request.delete_original);
        assert_eq!(request.dng_args.as_deref(), Some("-c -e -p2"));
        assert_eq!(request.sub_folder_pattern, SubFolderPattern::Ddmm);
    }
}
