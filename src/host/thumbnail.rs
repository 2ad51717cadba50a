use std::path::Path;

use tokio::process::Command;
use tracing::debug;

use crate::error::OpError;
use crate::models::PreviewResult;

use super::hash::hash_file;

/// Derive the preview for one source file: hash its content, then pull the
/// embedded thumbnail with exiftool into `<stem>_<hash16>.jpg` under the
/// cache directory. An already-cached thumbnail short-circuits the tool call;
/// the content hash is always recomputed from the source.
pub(super) async fn extract(
    thumbnail_dir: &Path,
    source: &Path,
) -> Result<PreviewResult, OpError> {
    if !source.exists() {
        return Err(OpError::PathNotFound(source.to_path_buf()));
    }
    tokio::fs::create_dir_all(thumbnail_dir).await?;

    let source_owned = source.to_path_buf();
    let content_hash = tokio::task::spawn_blocking(move || hash_file(&source_owned))
        .await
        .map_err(|err| OpError::Other(format!("hashing panicked: {err}")))??;

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| OpError::Other(format!("invalid source path: {}", source.display())))?;
    let thumbnail_path = thumbnail_dir.join(format!("{stem}_{}.jpg", &content_hash[..16]));

    if thumbnail_path.exists() {
        debug!(thumbnail = %thumbnail_path.display(), "thumbnail already cached");
    } else {
        write_embedded_thumbnail(source, &thumbnail_path).await?;
    }

    Ok(PreviewResult {
        original_path: source.display().to_string(),
        thumbnail_path: thumbnail_path.display().to_string(),
        content_hash,
    })
}

async fn write_embedded_thumbnail(source: &Path, thumbnail_path: &Path) -> Result<(), OpError> {
    let output = Command::new("exiftool")
        .arg("-ThumbnailImage")
        .arg("-b")
        .arg(source)
        .output()
        .await
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                OpError::ToolMissing { tool: "exiftool" }
            } else {
                OpError::Io(err)
            }
        })?;

    if !output.status.success() {
        return Err(OpError::tool(
            "exiftool",
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    if output.stdout.is_empty() {
        return Err(OpError::tool(
            "exiftool",
            format!("no embedded thumbnail in {}", source.display()),
        ));
    }

    tokio::fs::write(thumbnail_path, &output.stdout).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_source_reports_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract(dir.path(), Path::new("/nonexistent/IMG_0001.arw"))
            .await
            .unwrap_err();
        assert!(matches!(err, OpError::PathNotFound(_)));
    }

    #[tokio::test]
    async fn cached_thumbnail_skips_the_tool_call() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("IMG_0001.arw");
        std::fs::write(&source, b"raw bytes").unwrap();

        let content_hash = hash_file(&source).unwrap();
        let thumbs = dir.path().join("thumbs");
        std::fs::create_dir_all(&thumbs).unwrap();
        let cached = thumbs.join(format!("IMG_0001_{}.jpg", &content_hash[..16]));
        std::fs::write(&cached, b"jpeg bytes").unwrap();

        // exiftool would fail on this fake file; the cache hit avoids it.
        let result = extract(&thumbs, &source).await.unwrap();
        assert_eq!(result.content_hash, content_hash);
        assert_eq!(result.thumbnail_path, cached.display().to_string());
        assert_eq!(result.original_path, source.display().to_string());
    }
}
