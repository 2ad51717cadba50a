use crate::models::VolumeDescriptor;

#[cfg(not(target_os = "windows"))]
use std::path::Path;

/// Scan the conventional mount locations for this platform. A `DCIM` folder
/// at the volume root marks it removable (cameras and card readers create
/// one); read errors just leave volumes out of the list.
pub(super) fn scan_volumes() -> Vec<VolumeDescriptor> {
    let mut volumes = Vec::new();

    #[cfg(target_os = "macos")]
    {
        collect_mounts(Path::new("/Volumes"), &mut volumes);
    }

    #[cfg(target_os = "linux")]
    {
        // /media nests per-user directories one level deep.
        if let Ok(entries) = std::fs::read_dir("/media") {
            for entry in entries.filter_map(|e| e.ok()) {
                collect_mounts(&entry.path(), &mut volumes);
            }
        }
        collect_mounts(Path::new("/mnt"), &mut volumes);
    }

    #[cfg(target_os = "windows")]
    {
        for letter in b'A'..=b'Z' {
            let mount = format!("{}:\\", letter as char);
            let root = std::path::PathBuf::from(&mount);
            if root.exists() {
                volumes.push(VolumeDescriptor {
                    is_removable: root.join("DCIM").exists(),
                    display_name: mount.clone(),
                    mount_point: mount,
                });
            }
        }
    }

    volumes
}

#[cfg(not(target_os = "windows"))]
fn collect_mounts(base: &Path, volumes: &mut Vec<VolumeDescriptor>) {
    let Ok(entries) = std::fs::read_dir(base) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if display_name.is_empty() {
            continue;
        }
        volumes.push(VolumeDescriptor {
            mount_point: path.display().to_string(),
            display_name,
            is_removable: path.join("DCIM").exists(),
        });
    }
}
