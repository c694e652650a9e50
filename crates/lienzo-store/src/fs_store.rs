//! Disk-backed implementation of the artifact store port.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use lienzo_core::domain::artifact::{Artifact, MediaType};
use lienzo_core::ports::artifact_store::{ArtifactStore, ArtifactStoreError};

/// Artifact store rooted at a directory on the local filesystem.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ArtifactStoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| ArtifactStoreError::Io(format!("creating {}: {e}", root.display())))?;
        Ok(Self { root })
    }

    /// Absolute path of a stored artifact.
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Reject names that could escape the output directory.
    fn validate_name(name: &str) -> Result<(), ArtifactStoreError> {
        let clean = !name.is_empty()
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains("..");
        if clean {
            Ok(())
        } else {
            Err(ArtifactStoreError::Io(format!(
                "refusing artifact name {name:?}"
            )))
        }
    }
}

/// Identify the image format from its leading bytes.
///
/// Only formats the predictor is known to emit are accepted.
fn sniff_media_type(bytes: &[u8]) -> Option<MediaType> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(MediaType::Jpeg);
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some(MediaType::Png);
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some(MediaType::Webp);
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(MediaType::Gif);
    }
    None
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save(&self, bytes: &[u8]) -> Result<Artifact, ArtifactStoreError> {
        if bytes.is_empty() {
            return Err(ArtifactStoreError::Empty);
        }
        let media_type = sniff_media_type(bytes).ok_or(ArtifactStoreError::UnsupportedContent)?;

        let name = format!(
            "image_{}.{}",
            Uuid::new_v4().simple(),
            media_type.extension()
        );
        let final_path = self.path_of(&name);
        let temp_path = self.root.join(format!(".{name}.part"));

        let write = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&temp_path, &final_path).await
        };

        if let Err(e) = write.await {
            // Best-effort cleanup of the partial file.
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(ArtifactStoreError::Io(format!(
                "writing {}: {e}",
                final_path.display()
            )));
        }

        tracing::debug!(
            target: "lienzo.store",
            artifact = %name,
            len = bytes.len(),
            "artifact saved"
        );

        Ok(Artifact {
            name,
            media_type,
            len: bytes.len() as u64,
        })
    }

    async fn remove(&self, name: &str) -> Result<bool, ArtifactStoreError> {
        Self::validate_name(name)?;
        let path = self.path_of(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ArtifactStoreError::Io(format!(
                "removing {}: {e}",
                path.display()
            ))),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, ArtifactStoreError> {
        Self::validate_name(name)?;
        Ok(tokio::fs::try_exists(self.path_of(name))
            .await
            .map_err(|e| ArtifactStoreError::Io(e.to_string()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn store() -> (TempDir, FsArtifactStore) {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();
        (dir, store)
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend_from_slice(&[0u8; 32]);
        bytes
    }

    #[tokio::test]
    async fn test_save_writes_a_visible_file_with_sniffed_extension() {
        let (_dir, store) = store();
        let artifact = store.save(&png_bytes()).await.unwrap();

        assert!(artifact.name.starts_with("image_"));
        assert!(artifact.name.ends_with(".png"));
        assert_eq!(artifact.media_type, MediaType::Png);
        assert_eq!(artifact.len, 40);

        let on_disk = tokio::fs::read(store.path_of(&artifact.name)).await.unwrap();
        assert_eq!(on_disk, png_bytes());
    }

    #[tokio::test]
    async fn test_save_leaves_no_partial_file_behind() {
        let (dir, store) = store();
        store.save(&png_bytes()).await.unwrap();

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".part"), "leftover temp file: {name}");
        }
    }

    #[tokio::test]
    async fn test_save_rejects_empty_payload() {
        let (_dir, store) = store();
        let err = store.save(&[]).await.unwrap_err();
        assert!(matches!(err, ArtifactStoreError::Empty));
    }

    #[tokio::test]
    async fn test_save_rejects_unrecognized_content() {
        let (_dir, store) = store();
        let err = store.save(b"<html>error page</html>").await.unwrap_err();
        assert!(matches!(err, ArtifactStoreError::UnsupportedContent));
    }

    #[tokio::test]
    async fn test_distinct_saves_get_distinct_names() {
        let (_dir, store) = store();
        let a = store.save(&png_bytes()).await.unwrap();
        let b = store.save(&png_bytes()).await.unwrap();
        assert_ne!(a.name, b.name);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_dir, store) = store();
        let artifact = store.save(&png_bytes()).await.unwrap();

        assert!(store.remove(&artifact.name).await.unwrap());
        assert!(!store.remove(&artifact.name).await.unwrap());
        assert!(!store.exists(&artifact.name).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_refuses_traversal_names() {
        let (_dir, store) = store();
        assert!(store.remove("../etc/passwd").await.is_err());
        assert!(store.remove("a/b.png").await.is_err());
        assert!(store.remove("").await.is_err());
    }

    #[test]
    fn test_sniffing_covers_the_accepted_formats() {
        assert_eq!(
            sniff_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(MediaType::Jpeg)
        );
        assert_eq!(sniff_media_type(PNG_HEADER), Some(MediaType::Png));
        assert_eq!(
            sniff_media_type(b"RIFF\x00\x00\x00\x00WEBPVP8 "),
            Some(MediaType::Webp)
        );
        assert_eq!(sniff_media_type(b"GIF89a..."), Some(MediaType::Gif));
        assert_eq!(sniff_media_type(b"plain text"), None);
        assert_eq!(sniff_media_type(b"RIFF\x00\x00\x00\x00WAVE"), None);
    }
}
