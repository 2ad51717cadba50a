use std::sync::Mutex;

use tracing::{debug, error};

use crate::models::{SourceFile, VolumeDescriptor};
use crate::ops::ExternalOps;

/// Lifecycle of an on-demand query. `Ready` covers the failed case too: a
/// failed enumeration publishes an empty list and retains the error text,
/// it never propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Default)]
struct VolumeState {
    status: QueryStatus,
    volumes: Vec<VolumeDescriptor>,
    error: Option<String>,
    stale: bool,
}

/// The current set of mounted volumes. Re-fetched on focus or explicit
/// refresh, never persisted. State sits behind a lock so a shared reference
/// can observe `Loading` while a refresh is in flight; reads are snapshots.
#[derive(Debug, Default)]
pub struct VolumeQuery {
    state: Mutex<VolumeState>,
}

impl VolumeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh(&self, ops: &dyn ExternalOps) {
        self.state.lock().unwrap().status = QueryStatus::Loading;
        let outcome = ops.list_volumes().await;
        let mut state = self.state.lock().unwrap();
        match outcome {
            Ok(volumes) => {
                debug!(count = volumes.len(), "volume query resolved");
                state.volumes = volumes;
                state.error = None;
            }
            Err(err) => {
                error!(error = %err, "volume query failed");
                state.volumes = Vec::new();
                state.error = Some(err.to_string());
            }
        }
        state.status = QueryStatus::Ready;
        state.stale = false;
    }

    pub fn status(&self) -> QueryStatus {
        self.state.lock().unwrap().status
    }

    pub fn volumes(&self) -> Vec<VolumeDescriptor> {
        self.state.lock().unwrap().volumes.clone()
    }

    /// Only the volumes a memory card would show up as.
    pub fn removable(&self) -> Vec<VolumeDescriptor> {
        self.state
            .lock()
            .unwrap()
            .volumes
            .iter()
            .filter(|v| v.is_removable)
            .cloned()
            .collect()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    pub fn mark_stale(&self) {
        self.state.lock().unwrap().stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.state.lock().unwrap().stale
    }
}

#[derive(Debug, Default)]
struct ListingState {
    status: QueryStatus,
    mount_point: Option<String>,
    files: Vec<SourceFile>,
    error: Option<String>,
    stale: bool,
}

/// The candidate files of the currently chosen volume.
#[derive(Debug, Default)]
pub struct ListingQuery {
    state: Mutex<ListingState>,
}

impl ListingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch(&self, ops: &dyn ExternalOps, mount_point: &str) {
        {
            let mut state = self.state.lock().unwrap();
            state.mount_point = Some(mount_point.to_string());
            state.status = QueryStatus::Loading;
        }
        let outcome = ops.list_files(mount_point).await;
        let mut state = self.state.lock().unwrap();
        match outcome {
            Ok(files) => {
                debug!(mount_point, count = files.len(), "listing query resolved");
                state.files = files;
                state.error = None;
            }
            Err(err) => {
                error!(mount_point, error = %err, "listing query failed");
                state.files = Vec::new();
                state.error = Some(err.to_string());
            }
        }
        state.status = QueryStatus::Ready;
        state.stale = false;
    }

    pub fn status(&self) -> QueryStatus {
        self.state.lock().unwrap().status
    }

    pub fn mount_point(&self) -> Option<String> {
        self.state.lock().unwrap().mount_point.clone()
    }

    pub fn files(&self) -> Vec<SourceFile> {
        self.state.lock().unwrap().files.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    pub fn mark_stale(&self) {
        self.state.lock().unwrap().stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.state.lock().unwrap().stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpError;
    use crate::models::PreviewResult;
    use crate::ops::ImportRequest;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct FlakyOps {
        volumes_fail: bool,
        listing_fail: bool,
        delay_ms: u64,
    }

    #[async_trait]
    impl ExternalOps for FlakyOps {
        async fn list_volumes(&self) -> Result<Vec<VolumeDescriptor>, OpError> {
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.volumes_fail {
                return Err(OpError::Other("usb stack fell over".into()));
            }
            Ok(vec![
                VolumeDescriptor {
                    mount_point: "/Volumes/SD1".into(),
                    display_name: "SD1".into(),
                    is_removable: true,
                },
                VolumeDescriptor {
                    mount_point: "/".into(),
                    display_name: "Macintosh HD".into(),
                    is_removable: false,
                },
            ])
        }

        async fn list_files(&self, mount_point: &str) -> Result<Vec<SourceFile>, OpError> {
            if self.listing_fail {
                return Err(OpError::Other("read error".into()));
            }
            Ok(vec![SourceFile::file(format!("{mount_point}/a.arw"), 10)])
        }

        async fn extract_preview(&self, _path: &str) -> Result<PreviewResult, OpError> {
            Err(OpError::Other("unused".into()))
        }

        async fn is_dng_converter_available(&self) -> Result<bool, OpError> {
            Ok(false)
        }

        async fn copy_or_convert(&self, _request: &ImportRequest) -> Result<(), OpError> {
            Ok(())
        }

        async fn open_url(&self, _url: &str) -> Result<(), OpError> {
            Ok(())
        }
    }

    fn ops(volumes_fail: bool, listing_fail: bool) -> FlakyOps {
        FlakyOps {
            volumes_fail,
            listing_fail,
            delay_ms: 0,
        }
    }

    #[tokio::test]
    async fn volume_refresh_filters_removable() {
        let query = VolumeQuery::new();
        assert_eq!(query.status(), QueryStatus::Idle);

        query.refresh(&ops(false, false)).await;
        assert_eq!(query.status(), QueryStatus::Ready);
        assert_eq!(query.volumes().len(), 2);
        assert_eq!(query.removable().len(), 1);
        assert!(query.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn loading_is_observable_while_a_refresh_is_in_flight() {
        let query = Arc::new(VolumeQuery::new());
        let ops = Arc::new(FlakyOps {
            volumes_fail: false,
            listing_fail: false,
            delay_ms: 50,
        });

        let refresh = {
            let query = Arc::clone(&query);
            let ops = Arc::clone(&ops);
            tokio::spawn(async move { query.refresh(ops.as_ref()).await })
        };

        // Let the refresh reach its await.
        tokio::task::yield_now().await;
        assert_eq!(query.status(), QueryStatus::Loading);

        refresh.await.unwrap();
        assert_eq!(query.status(), QueryStatus::Ready);
        assert_eq!(query.volumes().len(), 2);
    }

    #[tokio::test]
    async fn failed_enumeration_surfaces_empty_list_and_error() {
        let flaky = ops(true, true);

        let volumes = VolumeQuery::new();
        volumes.refresh(&flaky).await;
        assert_eq!(volumes.status(), QueryStatus::Ready);
        assert!(volumes.volumes().is_empty());
        assert!(volumes.error().is_some());

        let listing = ListingQuery::new();
        listing.fetch(&flaky, "/Volumes/SD1").await;
        assert!(listing.files().is_empty());
        assert!(listing.error().is_some());
        assert_eq!(listing.mount_point().as_deref(), Some("/Volumes/SD1"));
    }

    #[tokio::test]
    async fn retry_after_failure_recovers() {
        let query = VolumeQuery::new();
        query.refresh(&ops(true, false)).await;
        assert!(query.volumes().is_empty());

        query.mark_stale();
        assert!(query.is_stale());

        query.refresh(&ops(false, false)).await;
        assert!(!query.is_stale());
        assert_eq!(query.volumes().len(), 2);
        assert!(query.error().is_none());
    }
}
