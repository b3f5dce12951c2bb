//! Trip CRUD routes

use std::str::FromStr;
use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use backend_storage::trip::{LocationPin, Trip, TripStore, Visibility};
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::{
    media_storage::MediaStorage,
    types::{ApiPath, ApiQuery, AppError, ValidatedJson},
};

const MISSING_IDS_MESSAGE: &str = "UserID and TripID are required";
const INVALID_VISIBILITY_MESSAGE: &str = "Visibility must be 'public' or 'private'";

fn parse_visibility(visibility: &str) -> Result<Visibility, AppError> {
    Visibility::from_str(visibility)
        .map_err(|_| AppError::bad_request("validation_error", INVALID_VISIBILITY_MESSAGE))
}

fn require_ids(
    user_id: Option<String>,
    trip_id: Option<String>,
) -> Result<(String, String), AppError> {
    match (user_id, trip_id) {
        (Some(user_id), Some(trip_id)) if !user_id.is_empty() && !trip_id.is_empty() => {
            Ok((user_id, trip_id))
        }
        _ => Err(AppError::bad_request(
            "validation_error",
            MISSING_IDS_MESSAGE,
        )),
    }
}

/// Request to create (or overwrite) a trip
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreateTripRequest {
    /// Owner identifier
    #[serde(rename = "UserID")]
    #[validate(length(min = 1, message = "UserID and TripID are required"))]
    pub user_id: Option<String>,
    /// Client-generated trip identifier
    #[serde(rename = "TripID")]
    #[validate(length(min = 1, message = "UserID and TripID are required"))]
    pub trip_id: Option<String>,
    /// Trip title
    #[serde(rename = "Title")]
    pub title: Option<String>,
    /// Free-text location
    #[serde(rename = "Location")]
    pub location: Option<String>,
    /// Free-text description
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Photo keys returned by `/upload`, cover photo first
    #[serde(rename = "ImageUrls")]
    pub image_urls: Option<Vec<String>>,
    /// Start date (`YYYY-MM-DD`)
    #[serde(rename = "StartDate")]
    pub start_date: Option<NaiveDate>,
    /// End date (`YYYY-MM-DD`)
    #[serde(rename = "EndDate")]
    pub end_date: Option<NaiveDate>,
    /// `public` (default) or `private`
    #[serde(rename = "Visibility")]
    pub visibility: Option<String>,
    /// Creation timestamp, defaults to now
    #[serde(rename = "CreatedAt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Map pins
    #[serde(rename = "Locations")]
    pub locations: Option<Vec<LocationPin>>,
}

impl CreateTripRequest {
    fn into_trip(self) -> Result<Trip, AppError> {
        let (user_id, trip_id) = require_ids(self.user_id, self.trip_id)?;
        let visibility = self
            .visibility
            .as_deref()
            .map(parse_visibility)
            .transpose()?
            .unwrap_or_default();

        Ok(Trip {
            user_id,
            trip_id,
            title: self.title,
            location: self.location,
            description: self.description,
            image_urls: self.image_urls.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            visibility,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            locations: self.locations,
        })
    }
}

/// Request to change the visibility of a trip
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct UpdateTripRequest {
    /// Owner identifier
    #[serde(rename = "UserID")]
    #[validate(length(min = 1, message = "UserID and TripID are required"))]
    pub user_id: Option<String>,
    /// Trip identifier
    #[serde(rename = "TripID")]
    #[validate(length(min = 1, message = "UserID and TripID are required"))]
    pub trip_id: Option<String>,
    /// Exactly `public` or `private`
    #[serde(rename = "Visibility")]
    pub visibility: Option<String>,
}

/// Request to delete a trip
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct DeleteTripRequest {
    /// Owner identifier
    #[serde(rename = "UserID")]
    #[validate(length(min = 1, message = "UserID and TripID are required"))]
    pub user_id: Option<String>,
    /// Trip identifier
    #[serde(rename = "TripID")]
    #[validate(length(min = 1, message = "UserID and TripID are required"))]
    pub trip_id: Option<String>,
}

/// Query parameters identifying the trip owner
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UserQuery {
    /// Owner identifier
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Path parameters for a single trip
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TripPath {
    /// Trip identifier
    pub id: String,
}

/// A message plus the affected trip
#[derive(Debug, Serialize, JsonSchema)]
pub struct TripResponse {
    /// Human-readable outcome
    pub message: String,
    /// The stored trip
    pub trip: Trip,
}

/// A plain message response
#[derive(Debug, Serialize, JsonSchema)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Replaces the cover photo with a presigned read URL
///
/// On failure the trip is returned exactly as stored.
async fn with_presigned_cover(media_storage: &MediaStorage, mut trip: Trip) -> Trip {
    let Some(cover) = trip.cover_photo() else {
        return trip;
    };

    match media_storage.generate_presigned_get_url(cover).await {
        Ok(presigned) => trip.image_urls[0] = presigned.url,
        Err(e) => tracing::warn!(trip_id = %trip.trip_id, "Failed to presign cover photo: {e}"),
    }

    trip
}

/// Replaces every photo with a presigned read URL
///
/// Photos that fail to resolve keep their stored value.
async fn with_presigned_photos(media_storage: &MediaStorage, mut trip: Trip) -> Trip {
    let stored = std::mem::take(&mut trip.image_urls);
    let presigned = media_storage.generate_presigned_get_urls(&stored).await;

    trip.image_urls = stored
        .into_iter()
        .zip(presigned)
        .map(|(stored, result)| match result {
            Ok(presigned) => presigned.url,
            Err(e) => {
                tracing::warn!(trip_id = %trip.trip_id, "Failed to presign photo: {e}");
                stored
            }
        })
        .collect();

    trip
}

/// Create a trip
///
/// Writes the full record unconditionally; a second call with the same
/// `UserID`/`TripID` overwrites the first. Omitted fields are defaulted:
/// no photos, `public` visibility and the current time as `CreatedAt`.
///
/// # Returns
///
/// Returns `201 CREATED` with the stored record
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Missing `UserID`/`TripID` or invalid `Visibility`
/// - `500 INTERNAL_SERVER_ERROR` - Storage operation fails
#[instrument(skip(trip_store, payload))]
pub async fn create_trip(
    Extension(trip_store): Extension<Arc<dyn TripStore>>,
    ValidatedJson(payload): ValidatedJson<CreateTripRequest>,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let trip = payload.into_trip()?;

    trip_store.put(&trip).await?;

    tracing::info!(user_id = %trip.user_id, trip_id = %trip.trip_id, "Trip created");

    Ok((
        StatusCode::CREATED,
        Json(TripResponse {
            message: "Trip added successfully".to_string(),
            trip,
        }),
    ))
}

/// List a user's trips
///
/// Returns every trip owned by `userId`, public or private. The cover photo of
/// each trip is replaced with a presigned read URL.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Missing `userId`
/// - `500 INTERNAL_SERVER_ERROR` - Storage operation fails
#[instrument(skip(trip_store, media_storage))]
pub async fn list_trips(
    Extension(trip_store): Extension<Arc<dyn TripStore>>,
    Extension(media_storage): Extension<Arc<MediaStorage>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let Some(user_id) = query.user_id.filter(|id| !id.is_empty()) else {
        return Err(AppError::bad_request(
            "validation_error",
            "Missing UserID parameter",
        ));
    };

    let trips = trip_store.list_by_user(&user_id).await?;

    let trips = join_all(
        trips
            .into_iter()
            .map(|trip| with_presigned_cover(&media_storage, trip)),
    )
    .await;

    Ok(Json(trips))
}

/// List public trips
///
/// Returns every trip with `public` visibility across all users, with the
/// cover photo replaced by a presigned read URL.
///
/// # Errors
///
/// Returns an error if:
/// - `500 INTERNAL_SERVER_ERROR` - Storage operation fails
#[instrument(skip(trip_store, media_storage))]
pub async fn list_public_trips(
    Extension(trip_store): Extension<Arc<dyn TripStore>>,
    Extension(media_storage): Extension<Arc<MediaStorage>>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let trips = trip_store.list_public().await?;

    let trips = join_all(
        trips
            .into_iter()
            .map(|trip| with_presigned_cover(&media_storage, trip)),
    )
    .await;

    Ok(Json(trips))
}

/// Get a trip
///
/// Returns one trip with every photo replaced by a presigned read URL.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Missing `userId` or trip id
/// - `404 NOT_FOUND` - Trip does not exist
/// - `500 INTERNAL_SERVER_ERROR` - Storage operation fails
#[instrument(skip(trip_store, media_storage))]
pub async fn get_trip(
    Extension(trip_store): Extension<Arc<dyn TripStore>>,
    Extension(media_storage): Extension<Arc<MediaStorage>>,
    ApiPath(path): ApiPath<TripPath>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Trip>, AppError> {
    let (user_id, trip_id) = match (query.user_id, path.id) {
        (Some(user_id), trip_id) if !user_id.is_empty() && !trip_id.is_empty() => {
            (user_id, trip_id)
        }
        _ => {
            return Err(AppError::bad_request(
                "validation_error",
                "Missing UserID or TripID parameter",
            ))
        }
    };

    let Some(trip) = trip_store.get_one(&user_id, &trip_id).await? else {
        return Err(AppError::trip_not_found());
    };

    Ok(Json(with_presigned_photos(&media_storage, trip).await))
}

/// Update a trip's visibility
///
/// Verifies the trip exists, then sets only its `Visibility` attribute.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Missing ids or visibility other than `public`/`private`
/// - `404 NOT_FOUND` - Trip does not exist
/// - `500 INTERNAL_SERVER_ERROR` - Storage operation fails
#[instrument(skip(trip_store, payload))]
pub async fn update_trip(
    Extension(trip_store): Extension<Arc<dyn TripStore>>,
    ValidatedJson(payload): ValidatedJson<UpdateTripRequest>,
) -> Result<Json<TripResponse>, AppError> {
    let (user_id, trip_id) = require_ids(payload.user_id, payload.trip_id)?;
    let visibility = parse_visibility(payload.visibility.as_deref().unwrap_or_default())?;

    if trip_store.get_one(&user_id, &trip_id).await?.is_none() {
        return Err(AppError::trip_not_found());
    }

    let trip = trip_store
        .update_visibility(&user_id, &trip_id, visibility)
        .await?;

    tracing::info!(%user_id, %trip_id, %visibility, "Trip visibility updated");

    Ok(Json(TripResponse {
        message: "Trip visibility updated successfully".to_string(),
        trip,
    }))
}

/// Delete a trip
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Missing `UserID`/`TripID`
/// - `404 NOT_FOUND` - Trip does not exist
/// - `500 INTERNAL_SERVER_ERROR` - Storage operation fails
#[instrument(skip(trip_store, payload))]
pub async fn delete_trip(
    Extension(trip_store): Extension<Arc<dyn TripStore>>,
    ValidatedJson(payload): ValidatedJson<DeleteTripRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (user_id, trip_id) = require_ids(payload.user_id, payload.trip_id)?;

    trip_store.delete(&user_id, &trip_id).await?;

    tracing::info!(%user_id, %trip_id, "Trip deleted");

    Ok(Json(MessageResponse {
        message: "Trip deleted successfully".to_string(),
    }))
}
