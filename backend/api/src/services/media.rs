/// Local disk storage for uploaded media
///
/// Files land under the configured upload directory and are served back
/// at `/uploads/{name}`. There is no content-addressing or deduplication;
/// the stored name is a timestamp prefix plus the sanitized client name.
use crate::error::{AppError, Result};
use crate::models::MediaKind;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Route prefix under which stored files are served
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Outcome of a successful save
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub relative_url: String,
    pub size: usize,
    pub kind: MediaKind,
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    dir: PathBuf,
    max_bytes: usize,
}

impl MediaStorage {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Persist an uploaded file and return its stored identity.
    ///
    /// The media kind comes from MIME-prefix inspection of the client's
    /// content type; nothing else about the payload is examined.
    pub async fn save(
        &self,
        original_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredFile> {
        if data.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Max {} bytes",
                self.max_bytes
            )));
        }

        let file_name = format!(
            "{}_{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );

        tokio::fs::write(self.dir.join(&file_name), data).await?;

        Ok(StoredFile {
            relative_url: format!("{}{}", UPLOADS_PREFIX, file_name),
            kind: MediaKind::from_mime(content_type),
            size: data.len(),
            file_name,
        })
    }

    /// Best-effort removal of a previously stored file. Only URLs under
    /// the uploads prefix refer to local files; anything else is ignored.
    pub async fn remove_by_url(&self, url: &str) {
        let Some(file_name) = url.strip_prefix(UPLOADS_PREFIX) else {
            return;
        };

        // Stored names never contain separators; reject anything that
        // could escape the upload directory.
        if file_name.contains('/') || file_name.contains("..") {
            return;
        }

        if let Err(err) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            tracing::warn!(%url, "failed to remove stored file: {}", err);
        }
    }
}

/// Keep alphanumerics, dots, dashes and underscores; everything else
/// becomes an underscore. Prevents path traversal via the client name.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Build an absolute URL for a stored file from the request's connection
/// info. Already-absolute URLs pass through untouched.
pub fn absolute_url(scheme: &str, host: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}://{}{}", scheme, host, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_file_name("photo-1.jpg"), "photo-1.jpg");
        assert_eq!(sanitize_file_name("my file (2).png"), "my_file__2_.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._.._etc_passwd");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn absolute_url_joins_relative_paths() {
        assert_eq!(
            absolute_url("http", "localhost:3000", "/uploads/a.png"),
            "http://localhost:3000/uploads/a.png"
        );
    }

    #[test]
    fn absolute_url_passes_through_absolute() {
        assert_eq!(
            absolute_url("http", "localhost:3000", "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[tokio::test]
    async fn save_and_remove_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(tmp.path(), 1024);
        storage.ensure_dir().await.unwrap();

        let stored = storage
            .save("pic.png", "image/png", b"not really a png")
            .await
            .unwrap();
        assert!(stored.relative_url.starts_with(UPLOADS_PREFIX));
        assert_eq!(stored.kind, MediaKind::Image);
        assert!(tmp.path().join(&stored.file_name).exists());

        storage.remove_by_url(&stored.relative_url).await;
        assert!(!tmp.path().join(&stored.file_name).exists());
    }

    #[tokio::test]
    async fn save_rejects_oversized_payloads() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(tmp.path(), 4);

        let result = storage.save("big.bin", "video/mp4", b"12345").await;
        assert!(matches!(result, Err(AppError::PayloadTooLarge(_))));
    }

    #[tokio::test]
    async fn remove_ignores_foreign_urls() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(tmp.path(), 1024);

        // Neither should touch the filesystem or panic
        storage.remove_by_url("https://cdn.example.com/x.png").await;
        storage.remove_by_url("/uploads/../escape").await;
    }
}
