//! Image upload gate and on-disk image store
//!
//! A file is accepted only when both its declared extension and its
//! declared MIME type name an allowed image format. Accepted files are
//! written under a generated name; rejected ones never touch the disk.

use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Per-file ceiling (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Whole-request ceiling: one image plus room for the text fields
pub const REQUEST_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// The only multipart field allowed to carry a file
pub const IMAGE_FIELD: &str = "image";

/// URL prefix the upload directory is served under
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Invalid file type '{file_name}' ({content_type})")]
    InvalidFileType {
        file_name: String,
        content_type: String,
    },

    #[error("File exceeds the 5 MiB limit")]
    FileTooLarge,

    #[error("Only one file may be uploaded per request")]
    TooManyFiles,

    #[error("Unexpected file field '{0}'")]
    UnexpectedField(String),

    #[error("Malformed multipart body: {0}")]
    Malformed(String),
}

/// Check the declared name and MIME type of an incoming file.
///
/// Returns the lower-cased extension to keep on the stored file.
pub fn check_image_type(file_name: &str, content_type: Option<&str>) -> Result<String, UploadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| ALLOWED_MIME_TYPES.contains(&ct.as_str()));

    match (extension, mime) {
        (Some(ext), Some(_)) => Ok(ext),
        _ => Err(UploadError::InvalidFileType {
            file_name: file_name.to_string(),
            content_type: content_type.unwrap_or("unknown").to_string(),
        }),
    }
}

/// `event-<unix-millis>-<random 0..1e9>.<ext>`
pub fn generate_file_name(extension: &str) -> String {
    format!(
        "event-{}-{}.{}",
        Utc::now().timestamp_millis(),
        rand::random_range(0..1_000_000_000u32),
        extension
    )
}

/// An image that passed the gate and was written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    /// Path recorded on the event, `/uploads/<file_name>`
    pub public_path: String,
}

/// Directory holding uploaded event images
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it is missing
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        info!(dir = %self.dir.display(), "Upload directory ready");
        Ok(())
    }

    /// Write an accepted image under a freshly generated name.
    pub async fn save(&self, extension: &str, bytes: &[u8]) -> io::Result<StoredImage> {
        let file_name = generate_file_name(extension);
        let path = self.dir.join(&file_name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        debug!(file = %file_name, size = bytes.len(), "Stored uploaded image");
        Ok(StoredImage {
            public_path: format!("{}/{}", UPLOADS_URL_PREFIX, file_name),
            file_name,
        })
    }

    /// Resolve a recorded `/uploads/...` path to a file in this store.
    ///
    /// Only the final path component is used.
    pub fn disk_path(&self, public_path: &str) -> Option<PathBuf> {
        let name = Path::new(public_path).file_name()?;
        Some(self.dir.join(name))
    }

    /// Best-effort removal. Failures are logged, never returned.
    pub async fn remove(&self, public_path: &str) {
        let Some(path) = self.disk_path(public_path) else {
            warn!(path = public_path, "Image path has no file name, skipping removal");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!(path = public_path, "Removed image"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = public_path, "Image already absent")
            }
            Err(e) => warn!(path = public_path, error = %e, "Failed to remove image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_image_type_accepts_allowed_pairs() {
        assert_eq!(
            check_image_type("photo.JPG", Some("image/jpeg")).unwrap(),
            "jpg"
        );
        assert_eq!(
            check_image_type("banner.webp", Some("IMAGE/WEBP; charset=binary")).unwrap(),
            "webp"
        );
        assert_eq!(check_image_type("a.b.png", Some("image/png")).unwrap(), "png");
    }

    #[test]
    fn test_check_image_type_requires_both_checks() {
        assert!(check_image_type("photo.exe", Some("application/octet-stream")).is_err());
        assert!(check_image_type("photo.exe", Some("image/png")).is_err());
        assert!(check_image_type("photo.png", Some("text/plain")).is_err());
        assert!(check_image_type("photo.png", None).is_err());
        assert!(check_image_type("photo", Some("image/png")).is_err());
        assert!(check_image_type(".png", Some("image/png")).is_err());
    }

    #[test]
    fn test_generate_file_name_shape() {
        let name = generate_file_name("png");
        let parts: Vec<&str> = name.trim_end_matches(".png").split('-').collect();
        assert_eq!(parts[0], "event");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u32>().unwrap() < 1_000_000_000);
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_disk_path_uses_final_component_only() {
        let store = ImageStore::new("/srv/uploads");
        assert_eq!(
            store.disk_path("/uploads/event-1-2.png").unwrap(),
            PathBuf::from("/srv/uploads/event-1-2.png")
        );
        assert_eq!(
            store.disk_path("/uploads/../../etc/passwd").unwrap(),
            PathBuf::from("/srv/uploads/passwd")
        );
        assert!(store.disk_path("/").is_none());
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("uploads"));
        store.ensure_dir().await.unwrap();

        let stored = store.save("gif", b"GIF89a").await.unwrap();
        assert!(stored.public_path.starts_with("/uploads/event-"));
        let path = store.disk_path(&stored.public_path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"GIF89a");

        store.remove(&stored.public_path).await;
        assert!(!path.exists());

        // second removal is a logged no-op
        store.remove(&stored.public_path).await;
    }
}
