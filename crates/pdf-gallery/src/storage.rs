//! Filesystem housekeeping: source discovery and working areas

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::types::*;
use std::io::ErrorKind;
use std::path::Path;

/// Whether a path carries one of the supported raster extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// List the supported images in `dir`, sorted by file name.
///
/// The sort makes the enumeration order canonical; everything downstream
/// (chunk membership, page order) follows it.
pub async fn list_source_images(dir: impl AsRef<Path>) -> Result<Vec<SourceImage>> {
    let mut entries = tokio::fs::read_dir(dir.as_ref()).await?;
    let mut images = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_supported_image(&path) {
            continue;
        }

        // Follows symlinks; a dangling link is skipped like any non-file
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Skipping dangling link {}", path.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            continue;
        }

        images.push(SourceImage {
            path,
            byte_size: metadata.len(),
        });
    }

    images.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(images)
}

/// Remove `dir` if present and create it empty
pub async fn reset_working_area(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    remove_working_area(dir).await?;
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Recursively delete a working area. A missing directory is not an error.
pub async fn remove_working_area(dir: impl AsRef<Path>) -> Result<()> {
    match tokio::fs::remove_dir_all(dir.as_ref()).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Delete every working area after a successful merge
pub async fn cleanup(dirs: &[impl AsRef<Path>]) -> Result<()> {
    for dir in dirs {
        log::debug!("Removing working area {}", dir.as_ref().display());
        remove_working_area(dir).await?;
    }
    Ok(())
}
