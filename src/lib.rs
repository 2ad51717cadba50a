//! Core of a RAW photo import tool: pick a removable volume, list its RAW
//! files, extract a preview per file concurrently, select by content hash,
//! and dispatch one bulk copy/convert into the destination folder.
//!
//! The orchestration lives here; the filesystem walking, thumbnail
//! extraction and DNG conversion sit behind the [`ops::ExternalOps`]
//! boundary, with [`host::HostOps`] as the production implementation.

pub mod app;
pub mod dialogs;
pub mod error;
pub mod extractor;
pub mod host;
pub mod importer;
pub mod models;
pub mod monitor;
pub mod ops;
pub mod query;
pub mod selection;
pub mod settings;

pub use app::{AppState, ImportOutcome, DNG_CONVERTER_HELP_URL};
pub use error::OpError;
pub use extractor::{ExtractionFailure, Extractor};
pub use host::HostOps;
pub use importer::ImportDispatcher;
pub use models::{PreviewResult, SourceFile, VolumeDescriptor};
pub use monitor::{VolumeEvent, VolumeMonitor};
pub use ops::{ExternalOps, ImportRequest};
pub use query::{ListingQuery, QueryStatus, VolumeQuery};
pub use selection::SelectionSet;
pub use settings::{Settings, SettingsStore};
