use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, info};

use crate::error::OpError;
use crate::ops::ImportRequest;
use crate::settings::SubFolderPattern;

use super::exif;
use super::probe::dng_converter_binary;

/// The bulk copy/convert operation. Files land under the destination in a
/// sub-folder derived from the request's pattern; conversion shells out to
/// the Adobe DNG Converter, plain imports copy with a conflict-free name.
/// The first failing file fails the whole batch.
pub(super) async fn run(request: &ImportRequest) -> Result<(), OpError> {
    let destination = Path::new(&request.destination);
    info!(
        files = request.sources.len(),
        destination = %destination.display(),
        convert = request.convert_to_dng,
        "bulk import started"
    );

    for source in &request.sources {
        let source_path = PathBuf::from(source);
        if !source_path.exists() {
            return Err(OpError::PathNotFound(source_path));
        }

        let dest_dir = match sub_folder_name(request, &source_path).await {
            Some(name) => destination.join(name),
            None => destination.to_path_buf(),
        };
        tokio::fs::create_dir_all(&dest_dir).await?;

        if request.convert_to_dng {
            convert_one(&source_path, &dest_dir, request.dng_args.as_deref()).await?;
        } else {
            copy_one(&source_path, &dest_dir).await?;
        }

        if request.delete_original {
            tokio::fs::remove_file(&source_path).await?;
        }
    }

    Ok(())
}

/// Sub-folder for one file, or `None` to import directly into the
/// destination. Date patterns prefer the EXIF shot date and fall back to the
/// file's modification date.
async fn sub_folder_name(request: &ImportRequest, source: &Path) -> Option<String> {
    match request.sub_folder_pattern.date_format() {
        Some(format) => {
            let date = file_date(source).await;
            Some(date.format(format).to_string())
        }
        None => match request.sub_folder_pattern {
            SubFolderPattern::Custom if !request.custom_sub_folder_name.is_empty() => {
                Some(request.custom_sub_folder_name.clone())
            }
            _ => None,
        },
    }
}

async fn file_date(source: &Path) -> NaiveDate {
    let path = source.to_path_buf();
    let shot = tokio::task::spawn_blocking(move || exif::shot_date(&path))
        .await
        .ok()
        .flatten();
    if let Some(date) = shot {
        return date;
    }

    debug!(path = %source.display(), "no EXIF shot date, using modification date");
    tokio::fs::metadata(source)
        .await
        .ok()
        .and_then(|m| m.modified().ok())
        .map(|modified| DateTime::<Local>::from(modified).date_naive())
        .unwrap_or_else(|| Local::now().date_naive())
}

async fn convert_one(
    source: &Path,
    dest_dir: &Path,
    dng_args: Option<&str>,
) -> Result<(), OpError> {
    let binary = dng_converter_binary().ok_or(OpError::UnsupportedPlatform("DNG conversion"))?;

    let mut command = tokio::process::Command::new(binary);
    command.arg("-mp");
    if let Some(args) = dng_args {
        command.args(args.split_whitespace());
    }
    command.arg("-d").arg(dest_dir).arg(source);

    let output = command.output().await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            OpError::ToolMissing {
                tool: "Adobe DNG Converter",
            }
        } else {
            OpError::Io(err)
        }
    })?;

    if !output.status.success() {
        return Err(OpError::tool(
            "Adobe DNG Converter",
            format!(
                "exited with {} for {}",
                output.status,
                source.display()
            ),
        ));
    }
    Ok(())
}

async fn copy_one(source: &Path, dest_dir: &Path) -> Result<(), OpError> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| OpError::Other(format!("invalid source path: {}", source.display())))?;

    let dest = conflict_free_destination(dest_dir, file_name, source);
    tokio::fs::copy(source, &dest).await?;
    debug!(from = %source.display(), to = %dest.display(), "copied");
    Ok(())
}

/// Never overwrite: an existing destination name gets a `_1`, `_2`, ...
/// suffix before the extension.
fn conflict_free_destination(dest_dir: &Path, file_name: &str, source: &Path) -> PathBuf {
    let dest = dest_dir.join(file_name);
    if !dest.exists() {
        return dest;
    }

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("");

    let mut counter = 1;
    loop {
        let candidate = if ext.is_empty() {
            format!("{stem}_{counter}")
        } else {
            format!("{stem}_{counter}.{ext}")
        };
        let candidate = dest_dir.join(candidate);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sources: Vec<String>, destination: &Path) -> ImportRequest {
        ImportRequest {
            sources,
            destination: destination.display().to_string(),
            convert_to_dng: false,
            delete_original: false,
            dng_args: None,
            sub_folder_pattern: SubFolderPattern::None,
            custom_sub_folder_name: String::new(),
        }
    }

    #[tokio::test]
    async fn copies_into_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("IMG_0001.arw");
        std::fs::write(&source, b"raw").unwrap();
        let dest = dir.path().join("out");

        run(&request(vec![source.display().to_string()], &dest))
            .await
            .unwrap();

        assert_eq!(std::fs::read(dest.join("IMG_0001.arw")).unwrap(), b"raw");
        assert!(source.exists(), "original kept without delete_original");
    }

    #[tokio::test]
    async fn custom_pattern_uses_the_custom_sub_folder() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("IMG_0002.arw");
        std::fs::write(&source, b"raw2").unwrap();
        let dest = dir.path().join("out");

        let mut request = request(vec![source.display().to_string()], &dest);
        request.sub_folder_pattern = SubFolderPattern::Custom;
        request.custom_sub_folder_name = "Holiday".into();
        run(&request).await.unwrap();

        assert!(dest.join("Holiday").join("IMG_0002.arw").exists());
    }

    #[tokio::test]
    async fn name_conflicts_get_a_numeric_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("IMG_0003.arw");
        std::fs::write(&source, b"new").unwrap();
        let dest = dir.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("IMG_0003.arw"), b"old").unwrap();

        run(&request(vec![source.display().to_string()], &dest))
            .await
            .unwrap();

        assert_eq!(std::fs::read(dest.join("IMG_0003.arw")).unwrap(), b"old");
        assert_eq!(std::fs::read(dest.join("IMG_0003_1.arw")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn delete_original_removes_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("IMG_0004.arw");
        std::fs::write(&source, b"raw").unwrap();
        let dest = dir.path().join("out");

        let mut request = request(vec![source.display().to_string()], &dest);
        request.delete_original = true;
        run(&request).await.unwrap();

        assert!(!source.exists());
        assert!(dest.join("IMG_0004.arw").exists());
    }

    #[tokio::test]
    async fn missing_source_fails_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let err = run(&request(vec!["/nonexistent/IMG.arw".into()], &dest))
            .await
            .unwrap_err();
        assert!(matches!(err, OpError::PathNotFound(_)));
    }
}
