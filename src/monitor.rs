use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::models::VolumeDescriptor;
use crate::ops::ExternalOps;

/// A removable volume appeared or went away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeEvent {
    Inserted(VolumeDescriptor),
    Removed(String),
}

/// Polls the volume list on an interval and reports insert/remove diffs, so
/// the UI can refresh its volume picker without the user re-focusing it.
pub struct VolumeMonitor {
    ops: Arc<dyn ExternalOps>,
    poll_interval: Duration,
}

impl VolumeMonitor {
    pub fn new(ops: Arc<dyn ExternalOps>) -> Self {
        Self {
            ops,
            poll_interval: Duration::from_secs(2),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Start polling. The task stops when the receiver is dropped. A failed
    /// enumeration skips the tick; it never synthesizes removal events.
    pub fn spawn(self, events: UnboundedSender<VolumeEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("volume monitor started");
            let mut known: HashMap<String, VolumeDescriptor> = HashMap::new();
            let mut first_tick = true;
            let mut interval = tokio::time::interval(self.poll_interval);

            loop {
                interval.tick().await;

                let current = match self.ops.list_volumes().await {
                    Ok(volumes) => volumes,
                    Err(err) => {
                        debug!(error = %err, "volume poll failed, skipping tick");
                        continue;
                    }
                };

                let current: HashMap<String, VolumeDescriptor> = current
                    .into_iter()
                    .filter(|v| v.is_removable)
                    .map(|v| (v.mount_point.clone(), v))
                    .collect();

                // The initial tick only seeds the known set; volumes already
                // present at startup are not "insertions".
                if !first_tick {
                    for (mount_point, volume) in &current {
                        if !known.contains_key(mount_point) {
                            info!(mount_point, "removable volume inserted");
                            if events.send(VolumeEvent::Inserted(volume.clone())).is_err() {
                                return;
                            }
                        }
                    }
                    for mount_point in known.keys() {
                        if !current.contains_key(mount_point) {
                            info!(mount_point, "removable volume removed");
                            if events
                                .send(VolumeEvent::Removed(mount_point.clone()))
                                .is_err()
                            {
                                return;
                            }
                        }
                    }
                }

                known = current;
                first_tick = false;
            }
        })
    }
}
