use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// A file received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobError {
    #[error("empty upload")]
    Empty,

    #[error("blob upload failed: {0}")]
    Io(String),
}

/// Blob storage for profile photos, resumes and logos.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `upload` under `folder` and return its public URL.
    async fn upload(&self, folder: &str, upload: Upload) -> Result<String, BlobError>;
}

/// Writes blobs below a local directory that the API serves statically.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

/// Keep only characters that are safe in a path segment and a URL.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() { "upload".to_string() } else { cleaned.to_string() }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, folder: &str, upload: Upload) -> Result<String, BlobError> {
        if upload.bytes.is_empty() {
            return Err(BlobError::Empty);
        }
        let folder = sanitize_file_name(folder);
        let key = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&upload.file_name));

        let dir = self.root.join(&folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| BlobError::Io(e.to_string()))?;
        tokio::fs::write(dir.join(&key), &upload.bytes)
            .await
            .map_err(|e| BlobError::Io(e.to_string()))?;

        tracing::debug!(%folder, %key, size = upload.bytes.len(), "blob stored");
        Ok(format!("{}/{}/{}", self.public_base_url, folder, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my resume (1).pdf"), "my_resume__1_.pdf");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[tokio::test]
    async fn uploads_land_under_the_folder_and_return_a_public_url() {
        let root = std::env::temp_dir().join(format!("jobboard-blobs-{}", Uuid::new_v4()));
        let store = LocalBlobStore::new(&root, "http://localhost:8080/uploads/");
        let url = store
            .upload(
                "resumes",
                Upload { file_name: "cv.pdf".into(), content_type: None, bytes: b"%PDF".to_vec() },
            )
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:8080/uploads/resumes/"));
        assert!(url.ends_with("-cv.pdf"));
        let key = url.rsplit('/').next().unwrap();
        assert_eq!(tokio::fs::read(root.join("resumes").join(key)).await.unwrap(), b"%PDF");
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn empty_uploads_are_refused() {
        let store = LocalBlobStore::new(std::env::temp_dir(), "http://x");
        let res = store
            .upload("logos", Upload { file_name: "a.png".into(), content_type: None, bytes: vec![] })
            .await;
        assert_eq!(res, Err(BlobError::Empty));
    }
}
