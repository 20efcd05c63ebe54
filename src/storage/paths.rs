//! Content storage path resolution.
//!
//! Blobs live under {base}/{h0}/{h1}/{hash}.{ext}, sharded by the first two
//! characters of the content hash. Names are validated before any path is
//! built; a bad name yields [`InvalidStorageFilename`], never a path.

use std::path::PathBuf;
use thiserror::Error;

use crate::db::entities::local_file;

#[derive(Debug, Error)]
#[error("Invalid storage filename: {0}")]
pub struct InvalidStorageFilename(pub String);

#[derive(Debug, Clone)]
pub struct ContentStorage {
    base_path: PathBuf,
}

impl ContentStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// On-disk path for a stored name like `abcd...ef.mp4`.
    pub fn storage_path(&self, filename: &str) -> Result<PathBuf, InvalidStorageFilename> {
        let (hash, _) = split_stored_name(filename)?;
        Ok(self
            .base_path
            .join(&hash[..1])
            .join(&hash[1..2])
            .join(filename))
    }

    /// Public URL the client fetches the blob from.
    pub fn storage_url(&self, filename: &str) -> Result<String, InvalidStorageFilename> {
        let (hash, _) = split_stored_name(filename)?;
        Ok(format!(
            "/content/storage/{}/{}/{}",
            &hash[..1],
            &hash[1..2],
            filename
        ))
    }
}

/// Stored name for a local file: `{hash}.{extension}`.
pub fn content_file_name(local_file: &local_file::Model) -> String {
    format!("{}.{}", local_file.id, local_file.extension)
}

/// Split and validate a stored name: 32 lowercase hex chars, a dot, an
/// alphanumeric extension.
fn split_stored_name(filename: &str) -> Result<(&str, &str), InvalidStorageFilename> {
    let invalid = || InvalidStorageFilename(filename.to_string());
    let (hash, extension) = filename.split_once('.').ok_or_else(invalid)?;
    if hash.len() != 32 || !hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
        return Err(invalid());
    }
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok((hash, extension))
}

/// Sanitize a suggested filename to a filesystem-valid form: trim, spaces
/// become underscores, everything but alphanumerics, `-`, `_` and `.` is
/// stripped.
pub fn valid_filename(name: &str) -> String {
    name.trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

/// Human-readable name a file should download as.
pub fn download_filename(title: &str, preset_label: &str, extension: &str) -> String {
    valid_filename(&format!("{} ({}).{}", title, preset_label, extension))
}

/// Download route path: keyed by the stored name, carrying the suggested
/// client-side filename. Serving this route is the host's concern.
pub fn download_url(stored_name: &str, download_name: &str) -> String {
    format!("/downloadcontent/{}/{}", stored_name, download_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "2a5fa4a3e82b4c5485ee1a9b2e33a4f2";

    #[test]
    fn test_storage_path_is_sharded() {
        let storage = ContentStorage::new(PathBuf::from("/srv/content"));
        let path = storage.storage_path(&format!("{}.mp4", HASH)).unwrap();
        assert_eq!(
            path,
            PathBuf::from(format!("/srv/content/2/a/{}.mp4", HASH))
        );
    }

    #[test]
    fn test_storage_url() {
        let storage = ContentStorage::new(PathBuf::from("/srv/content"));
        let url = storage.storage_url(&format!("{}.mp4", HASH)).unwrap();
        assert_eq!(url, format!("/content/storage/2/a/{}.mp4", HASH));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let storage = ContentStorage::new(PathBuf::from("/srv/content"));
        for name in [
            "short.mp4",
            "../../../../etc/passwd",
            &format!("{}.", HASH),
            &format!("{}", HASH),
            &format!("{}.mp4/evil", HASH),
            &format!("{}.MP../4", HASH),
        ] {
            assert!(storage.storage_path(name).is_err(), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_content_file_name() {
        let model = local_file::Model {
            id: HASH.to_string(),
            extension: "pdf".to_string(),
            available: true,
            file_size: None,
        };
        assert_eq!(content_file_name(&model), format!("{}.pdf", HASH));
    }

    #[test]
    fn test_valid_filename_sanitizes() {
        assert_eq!(valid_filename("  Intro to Algebra  "), "Intro_to_Algebra");
        assert_eq!(valid_filename("a/b\\c:d*e"), "abcde");
        assert_eq!(valid_filename("Vidéo (HD).mp4"), "Vidéo_HD.mp4");
    }

    #[test]
    fn test_download_filename_and_url() {
        let name = download_filename("Intro to Algebra", "High Resolution", "mp4");
        assert_eq!(name, "Intro_to_Algebra_High_Resolution.mp4");
        let url = download_url(&format!("{}.mp4", HASH), &name);
        assert_eq!(
            url,
            format!("/downloadcontent/{}.mp4/Intro_to_Algebra_High_Resolution.mp4", HASH)
        );
    }
}
