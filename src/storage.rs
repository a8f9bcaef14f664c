use async_trait::async_trait;
use aws_sdk_s3 as s3;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Error;

// 1. StorageService Contract
/// StorageService
///
/// The abstract contract for all interactions with the object storage layer.
/// The registry only ever persists the opaque reference this trait returns;
/// it never touches the bytes again. Swapping the concrete implementation —
/// the real S3 client in production, the in-memory mock in tests — leaves
/// the calling handlers untouched.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used in the `Env::Local` setup
    /// to automatically provision the required bucket in MinIO. No-op in
    /// production.
    async fn ensure_bucket_exists(&self);

    /// Writes the uploaded bytes to the object store and returns the
    /// location reference to persist alongside the image metadata.
    ///
    /// # Arguments
    /// * `data`: the raw upload bytes.
    /// * `original_filename`: client-supplied name, used only to derive the
    ///   object key's extension (after sanitization).
    /// * `content_type`: the MIME type recorded on the stored object.
    async fn store_object(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        content_type: &str,
    ) -> Result<String, Error>;
}

/// sanitize_key
///
/// Removes directory navigation components (`..`, `.`, empty segments) from
/// a user-provided name before it contributes to an object key.
fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// object_key_for
///
/// Derives the object key for an upload: a fresh UUID under `uploads/`,
/// keeping only the (sanitized) extension of the client filename. The
/// client never controls the stored name.
fn object_key_for(original_filename: &str) -> String {
    let sanitized = sanitize_key(original_filename);
    let extension = std::path::Path::new(&sanitized)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("bin");

    format!("uploads/{}.{}", Uuid::new_v4(), extension)
}

// 2. The Real Implementation (S3/MinIO)
/// S3StorageClient
///
/// The concrete implementation using the AWS SDK for S3. Due to S3
/// compatibility this client transparently handles both the Dockerized
/// MinIO instance used locally and any S3-compatible production endpoint.
///
/// `force_path_style(true)` is critical for MinIO compatibility.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
}

impl S3StorageClient {
    /// Constructs the S3 client using credentials and configuration from
    /// AppConfig.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            // Path-style addressing (http://endpoint/bucket/key) is required
            // by MinIO's API gateway.
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        Self {
            client,
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// Calls the S3 CreateBucket API. The call is idempotent, so it only
    /// creates the bucket if it does not already exist and is safe at
    /// startup.
    async fn ensure_bucket_exists(&self) {
        let _ = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await;
    }

    async fn store_object(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        content_type: &str,
    ) -> Result<String, Error> {
        let key = object_key_for(original_filename);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(s3::primitives::ByteStream::from(data))
            .send()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        // The reference persisted in the registry: a root-relative path the
        // serving layer resolves against the bucket.
        Ok(format!("/{key}"))
    }
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// A mock `StorageService` used by unit and integration tests. Produces the
/// same reference shape as the real client without any network I/O, and can
/// simulate upstream failure on demand.
#[derive(Clone)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockStorageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {
        // No-op in mock environment.
    }

    async fn store_object(
        &self,
        _data: Vec<u8>,
        original_filename: &str,
        _content_type: &str,
    ) -> Result<String, Error> {
        if self.should_fail {
            return Err(Error::Storage(
                "mock storage error: simulation requested".to_string(),
            ));
        }

        Ok(format!("/{}", object_key_for(original_filename)))
    }
}

/// StorageState
///
/// The concrete type used to share the storage service across the
/// application state.
pub type StorageState = Arc<dyn StorageService>;
