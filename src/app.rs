use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::dialogs::{DialogRegistry, DNG_CONVERTER_ALERT, DNG_SETTINGS_FORM};
use crate::extractor::Extractor;
use crate::importer::ImportDispatcher;
use crate::ops::ExternalOps;
use crate::query::{ListingQuery, VolumeQuery};
use crate::selection::SelectionSet;
use crate::settings::SettingsStore;

/// Help page offered when the DNG converter is not installed.
pub const DNG_CONVERTER_HELP_URL: &str =
    "https://helpx.adobe.com/uk/camera-raw/using/adobe-dng-converter.html";

/// Terminal outcome of the last dispatched import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Succeeded { files: usize },
    Failed { reason: String },
}

/// The whole client state, owned explicitly and threaded by reference into
/// whatever presents it. One instance drives one window's control flow:
/// volume query → listing query → extraction → selection → import.
pub struct AppState {
    ops: Arc<dyn ExternalOps>,
    pub volumes: VolumeQuery,
    pub listing: ListingQuery,
    pub extractor: Extractor,
    pub selection: SelectionSet,
    pub settings: SettingsStore,
    pub dialogs: DialogRegistry,
    importer: ImportDispatcher,
    last_import: Mutex<Option<ImportOutcome>>,
}

impl AppState {
    pub async fn new(ops: Arc<dyn ExternalOps>, settings_path: impl Into<PathBuf>) -> Self {
        let settings = SettingsStore::load(settings_path).await;
        let dialogs = DialogRegistry::new();
        dialogs.add(DNG_SETTINGS_FORM);
        dialogs.add(DNG_CONVERTER_ALERT);

        Self {
            volumes: VolumeQuery::new(),
            listing: ListingQuery::new(),
            extractor: Extractor::new(Arc::clone(&ops)),
            selection: SelectionSet::new(),
            settings,
            dialogs,
            importer: ImportDispatcher::new(Arc::clone(&ops)),
            ops,
            last_import: Mutex::new(None),
        }
    }

    /// Re-fetch the volume list (focus / explicit refresh).
    pub async fn refresh_volumes(&self) {
        self.volumes.refresh(self.ops.as_ref()).await;
    }

    /// The user picked a volume: list its files and re-extract previews.
    pub async fn select_volume(&self, mount_point: &str) {
        info!(mount_point, "volume selected");
        self.listing.fetch(self.ops.as_ref(), mount_point).await;
        let files = self.listing.files();
        self.extractor.refresh(&files, &self.selection).await;
    }

    /// Re-run listing and extraction for the currently chosen volume.
    pub async fn rescan(&self) {
        let Some(mount_point) = self.listing.mount_point() else {
            warn!("rescan requested without a chosen volume");
            return;
        };
        self.select_volume(&mount_point).await;
    }

    pub fn select_all(&self) {
        let results = self.extractor.results();
        self.selection.replace_all(&results);
    }

    pub fn select_none(&self) {
        self.selection.clear();
    }

    /// Gated settings mutation; opens the converter alert on rejection.
    pub async fn set_convert_to_dng(&mut self, value: bool) -> bool {
        self.settings
            .set_convert_to_dng(value, self.ops.as_ref(), &self.dialogs)
            .await
    }

    /// Primary action of the converter alert: open the download page and
    /// dismiss the dialog. The browser call is fire-and-forget.
    pub async fn get_dng_converter(&self) {
        if let Err(err) = self.ops.open_url(DNG_CONVERTER_HELP_URL).await {
            warn!(error = %err, "failed to open DNG converter help page");
        }
        self.dialogs.close(DNG_CONVERTER_ALERT);
    }

    /// Dispatch one bulk import of the current selection.
    pub async fn import(&self) -> bool {
        let published = self.extractor.results();
        let selected = self.selection.len();
        let outcome = self
            .importer
            .dispatch(&published, &self.selection, self.settings.get())
            .await;

        let succeeded = outcome.is_ok();
        *self.last_import.lock().unwrap() = Some(match outcome {
            Ok(()) => ImportOutcome::Succeeded { files: selected },
            Err(err) => ImportOutcome::Failed {
                reason: err.to_string(),
            },
        });
        succeeded
    }

    pub fn last_import(&self) -> Option<ImportOutcome> {
        self.last_import.lock().unwrap().clone()
    }
}
