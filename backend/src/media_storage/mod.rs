//! S3-based trip photo storage operations
mod error;
mod object_key;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use futures::future::join_all;

pub use error::{BucketError, BucketResult};
pub use object_key::{
    content_type_for_key, object_key_from_stored, ObjectKeyError, DEFAULT_CONTENT_TYPE,
};

/// Presigned URL and the object key it grants access to
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL
    pub url: String,
    /// Object key the URL grants access to
    pub key: String,
}

/// Photo storage client for S3 operations
pub struct MediaStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    upload_url_expiry_secs: u64,
    read_url_expiry_secs: u64,
}

impl MediaStorage {
    /// Creates a new media storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for trip photos
    /// * `upload_url_expiry_secs` - Expiry for presigned PUT URLs
    /// * `read_url_expiry_secs` - Expiry for presigned GET URLs
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        upload_url_expiry_secs: u64,
        read_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            upload_url_expiry_secs,
            read_url_expiry_secs,
        }
    }

    /// Object key a photo is uploaded under, scoped by owner and trip
    #[must_use]
    pub fn upload_object_key(user_id: &str, trip_id: &str, file_name: &str) -> String {
        format!("trips/{user_id}/{trip_id}/{file_name}")
    }

    fn presigning_config(expiry_secs: u64) -> BucketResult<PresigningConfig> {
        PresigningConfig::expires_in(Duration::from_secs(expiry_secs)).map_err(|e| {
            BucketError::ConfigError(format!("Failed to create presigning config: {e}"))
        })
    }

    /// Generates a presigned URL for uploading a photo
    ///
    /// The content type is signed, inferred from the key's extension.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::S3Error` if presigned URL generation fails
    /// Returns `BucketError::ConfigError` if presigning config creation fails
    pub async fn generate_presigned_put_url(&self, s3_key: &str) -> BucketResult<PresignedUrl> {
        let presigned_config = Self::presigning_config(self.upload_url_expiry_secs)?;

        let presigned_url = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(s3_key)
            .content_type(content_type_for_key(s3_key))
            .presigned(presigned_config)
            .await
            .map_err(|e| BucketError::S3Error(format!("Failed to generate presigned URL: {e}")))?;

        Ok(PresignedUrl {
            url: presigned_url.uri().to_string(),
            key: s3_key.to_string(),
        })
    }

    /// Generates a presigned URL for reading a stored photo reference
    ///
    /// `stored` may be an object key or a previously issued URL; see
    /// [`object_key_from_stored`]. The URL overrides the response content type
    /// based on the key's extension.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::InvalidKey` if the reference cannot be normalized
    /// Returns `BucketError::S3Error` if presigned URL generation fails
    /// Returns `BucketError::ConfigError` if presigning config creation fails
    pub async fn generate_presigned_get_url(&self, stored: &str) -> BucketResult<PresignedUrl> {
        let s3_key = object_key_from_stored(stored)?;
        let presigned_config = Self::presigning_config(self.read_url_expiry_secs)?;

        let presigned_url = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(&s3_key)
            .response_content_type(content_type_for_key(&s3_key))
            .response_cache_control(format!("max-age={}", self.read_url_expiry_secs))
            .presigned(presigned_config)
            .await
            .map_err(|e| BucketError::S3Error(format!("Failed to generate presigned URL: {e}")))?;

        Ok(PresignedUrl {
            url: presigned_url.uri().to_string(),
            key: s3_key,
        })
    }

    /// Presigns read URLs for every stored reference concurrently
    ///
    /// Results are returned in input order; one failure does not affect the others.
    pub async fn generate_presigned_get_urls(
        &self,
        stored: &[String],
    ) -> Vec<BucketResult<PresignedUrl>> {
        join_all(
            stored
                .iter()
                .map(|stored| self.generate_presigned_get_url(stored)),
        )
        .await
    }
}
