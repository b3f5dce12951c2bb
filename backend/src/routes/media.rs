//! Presigned upload and read URL routes

use std::sync::Arc;

use axum::{Extension, Json};
use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::{
    media_storage::MediaStorage,
    types::{AppError, ValidatedJson},
};

/// Request for presigned upload URLs, one per file
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlsRequest {
    /// Owner of the trip the photos belong to
    #[validate(length(min = 1, message = "userId, tripId, and fileNames (array) are required"))]
    pub user_id: Option<String>,
    /// Trip the photos belong to
    #[validate(length(min = 1, message = "userId, tripId, and fileNames (array) are required"))]
    pub trip_id: Option<String>,
    /// Client-side file names; the extension selects the content type
    pub file_names: Option<Vec<String>>,
}

/// Upload target for a single file
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrl {
    /// File name as sent by the client
    pub file_name: String,
    /// Presigned PUT URL
    pub upload_url: String,
    /// Object key to store on the trip once the upload succeeds
    pub image_url: String,
}

/// Presigned upload URLs, in request order
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlsResponse {
    /// One entry per requested file
    pub upload_urls: Vec<UploadUrl>,
}

/// Request to resolve stored photo references into readable URLs
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlsRequest {
    /// Object keys or previously issued URLs
    pub image_urls: Option<Vec<String>>,
}

/// Resolution outcome for one stored reference
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlResult {
    /// Reference as sent by the client
    pub original_url: String,
    /// Presigned GET URL, `null` when resolution failed
    pub presigned_url: Option<String>,
    /// Failure reason, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolved references, in request order
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlsResponse {
    /// One entry per requested reference
    pub image_urls: Vec<ImageUrlResult>,
}

/// Generate presigned upload URLs
///
/// Issues one presigned `PUT` URL per file name, keyed under
/// `trips/{userId}/{tripId}/{fileName}`. The returned `imageUrl` is the object
/// key the client stores on the trip after uploading.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Missing `userId`, `tripId` or `fileNames`
/// - `500 INTERNAL_SERVER_ERROR` - Presigning fails for any file
#[instrument(skip(media_storage, payload))]
pub async fn create_upload_urls(
    Extension(media_storage): Extension<Arc<MediaStorage>>,
    ValidatedJson(payload): ValidatedJson<UploadUrlsRequest>,
) -> Result<Json<UploadUrlsResponse>, AppError> {
    let (Some(user_id), Some(trip_id), Some(file_names)) =
        (payload.user_id, payload.trip_id, payload.file_names)
    else {
        return Err(AppError::bad_request(
            "validation_error",
            "userId, tripId, and fileNames (array) are required",
        ));
    };

    let media_storage = &media_storage;
    let presigned = join_all(file_names.iter().map(|file_name| {
        let key = MediaStorage::upload_object_key(&user_id, &trip_id, file_name);
        async move { media_storage.generate_presigned_put_url(&key).await }
    }))
    .await;

    let upload_urls = file_names
        .into_iter()
        .zip(presigned)
        .map(|(file_name, result)| {
            result.map(|presigned| UploadUrl {
                file_name,
                upload_url: presigned.url,
                image_url: presigned.key,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(%user_id, %trip_id, count = upload_urls.len(), "Issued upload URLs");

    Ok(Json(UploadUrlsResponse { upload_urls }))
}

/// Resolve photo references into readable URLs
///
/// Each reference is resolved independently; a reference that cannot be
/// resolved gets `presignedUrl: null` and an `error` without failing the batch.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Missing `imageUrls`
#[instrument(skip(media_storage, payload))]
pub async fn create_image_urls(
    Extension(media_storage): Extension<Arc<MediaStorage>>,
    ValidatedJson(payload): ValidatedJson<ImageUrlsRequest>,
) -> Result<Json<ImageUrlsResponse>, AppError> {
    let Some(stored) = payload.image_urls else {
        return Err(AppError::bad_request(
            "validation_error",
            "imageUrls array is required",
        ));
    };

    let presigned = media_storage.generate_presigned_get_urls(&stored).await;

    let image_urls = stored
        .into_iter()
        .zip(presigned)
        .map(|(original_url, result)| match result {
            Ok(presigned) => ImageUrlResult {
                original_url,
                presigned_url: Some(presigned.url),
                error: None,
            },
            Err(e) => {
                tracing::warn!(%original_url, "Failed to resolve image URL: {e}");
                ImageUrlResult {
                    original_url,
                    presigned_url: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    Ok(Json(ImageUrlsResponse { image_urls }))
}
