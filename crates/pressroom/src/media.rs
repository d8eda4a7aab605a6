//! Media uploads to an S3-compatible object store.
//!
//! The service validates the content type against a per-kind allow-list,
//! generates a collision-resistant object key, and hands the bytes to an
//! [`ObjectStorage`] backend. The public URL is derived from the configured
//! base; the store itself never serves redirects.

use async_trait::async_trait;
use pressroom_api::ApiError;
use rand::distributions::Alphanumeric;
use rand::Rng;

pub const IMAGE_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub const VIDEO_CONTENT_TYPES: [&str; 4] =
    ["video/mp4", "video/webm", "video/ogg", "video/quicktime"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn folder(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    pub fn allows(&self, content_type: &str) -> bool {
        match self {
            MediaKind::Image => IMAGE_CONTENT_TYPES.contains(&content_type),
            MediaKind::Video => VIDEO_CONTENT_TYPES.contains(&content_type),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub bucket: String,
    /// Base URL objects are publicly served from, without a trailing slash.
    pub public_base_url: String,
}

impl MediaConfig {
    /// Read `MEDIA_BUCKET` and `MEDIA_PUBLIC_URL`.
    ///
    /// # Errors
    ///
    /// `Internal` naming the missing variable.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = Self {
            bucket: require_env("MEDIA_BUCKET")?,
            public_base_url: require_env("MEDIA_PUBLIC_URL")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.bucket.trim().is_empty() || self.public_base_url.trim().is_empty() {
            return Err(ApiError::internal(
                "media configuration is incomplete: bucket and public URL are required",
            ));
        }
        Ok(())
    }
}

fn require_env(name: &'static str) -> Result<String, ApiError> {
    std::env::var(name)
        .map_err(|_| ApiError::internal(format!("missing environment variable: {name}")))
}

/// Storage backend seam; the production implementation speaks the S3 API,
/// tests use [`MemoryObjectStorage`].
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), ApiError>;
    async fn delete(&self, key: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub key: String,
    pub url: String,
}

pub struct MediaService<S> {
    config: MediaConfig,
    storage: S,
}

impl<S: ObjectStorage> MediaService<S> {
    pub fn new(config: MediaConfig, storage: S) -> Self {
        Self { config, storage }
    }

    /// Store a file and return its key and public URL.
    ///
    /// Keys look like `images/1724567890123_k3j9x7q2m1abc.png`: the kind
    /// folder, the upload timestamp, a random tag, and the original file
    /// extension.
    ///
    /// # Errors
    ///
    /// `Validation` when the content type is not allowed for `kind`.
    pub async fn upload(
        &self,
        kind: MediaKind,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaUpload, ApiError> {
        if !kind.allows(content_type) {
            return Err(ApiError::validation(format!(
                "content type {content_type} is not allowed for {} uploads",
                kind.folder()
            )));
        }

        let key = generate_key(kind, filename);
        self.storage.put(&key, content_type, bytes).await?;
        tracing::info!(key = %key, "uploaded media object");

        let url = format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            key
        );
        Ok(MediaUpload { key, url })
    }

    pub async fn delete(&self, key: &str) -> Result<(), ApiError> {
        self.storage.delete(key).await
    }
}

fn generate_key(kind: MediaKind, filename: &str) -> String {
    let ext = filename.rsplit('.').next().unwrap_or("bin").to_lowercase();
    let tag: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(13)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();
    format!(
        "{}/{}_{}.{}",
        kind.folder(),
        pressroom_api::now_millis(),
        tag,
        ext
    )
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemoryObjectStorage {
    objects: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStorage {
    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put(&self, key: &str, _content_type: &str, bytes: Vec<u8>) -> Result<(), ApiError> {
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ApiError> {
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found("media object", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MediaService<MemoryObjectStorage> {
        MediaService::new(
            MediaConfig {
                bucket: "pressroom-media".to_string(),
                public_base_url: "https://cdn.example.com".to_string(),
            },
            MemoryObjectStorage::default(),
        )
    }

    #[tokio::test]
    async fn upload_produces_folder_scoped_key_and_public_url() {
        let service = service();
        let upload = service
            .upload(MediaKind::Image, "cover.PNG", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(upload.key.starts_with("images/"));
        assert!(upload.key.ends_with(".png"));
        assert_eq!(upload.url, format!("https://cdn.example.com/{}", upload.key));
        assert!(service.storage.contains(&upload.key));
    }

    #[tokio::test]
    async fn disallowed_content_type_is_rejected() {
        let service = service();
        let err = service
            .upload(MediaKind::Image, "movie.mp4", "video/mp4", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn video_kind_uses_its_own_folder_and_list() {
        let service = service();
        let upload = service
            .upload(MediaKind::Video, "clip.webm", "video/webm", vec![0])
            .await
            .unwrap();
        assert!(upload.key.starts_with("videos/"));
    }

    #[tokio::test]
    async fn delete_of_unknown_key_is_not_found() {
        let service = service();
        let err = service.delete("images/missing.png").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn keys_are_unique_per_call() {
        let a = generate_key(MediaKind::Image, "a.png");
        let b = generate_key(MediaKind::Image, "a.png");
        assert_ne!(a, b);
    }

    #[test]
    fn blank_config_fails_validation() {
        let config = MediaConfig {
            bucket: "".to_string(),
            public_base_url: "https://cdn.example.com".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
