use std::sync::Arc;

use photo_importer::{AppState, HostOps, SettingsStore};

/// Headless pass over the pipeline: list volumes, and with a mount point
/// given, list its RAW files, extract previews and optionally import
/// everything that produced one.
///
/// Usage: photo-importer [MOUNT_POINT] [--import]
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photo_importer=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let run_import = args.iter().any(|a| a == "--import");
    let mount_point = args.iter().find(|a| !a.starts_with("--")).cloned();

    let ops = Arc::new(HostOps::new());
    let app = AppState::new(ops, SettingsStore::default_path()).await;

    app.refresh_volumes().await;
    println!("Volumes:");
    for volume in app.volumes.volumes() {
        let marker = if volume.is_removable { "*" } else { " " };
        println!("  {marker} {:30} {}", volume.display_name, volume.mount_point);
    }
    if app.volumes.volumes().is_empty() {
        if let Some(error) = app.volumes.error() {
            println!("  (none: {error})");
        } else {
            println!("  (none)");
        }
    }

    let Some(mount_point) = mount_point else {
        println!("\nPass a mount point to list and extract, --import to import all.");
        return;
    };

    app.select_volume(&mount_point).await;
    println!("\nPreviews on {mount_point}:");
    for result in app.extractor.results() {
        println!(
            "  {}  {}",
            &result.content_hash[..result.content_hash.len().min(16)],
            result.original_path
        );
    }
    for failure in app.extractor.failures() {
        println!("  FAILED {}: {}", failure.path, failure.reason);
    }

    if run_import {
        app.select_all();
        if app.import().await {
            println!("\nImport finished: {:?}", app.last_import());
        } else {
            println!("\nImport failed: {:?}", app.last_import());
            std::process::exit(1);
        }
    }
}
