//! Trip storage integration using Dynamo DB
//!
//! One table keyed by (`UserID`, `TripID`) holds every trip. Photo bytes live in S3;
//! the table only stores the object keys.

mod error;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::SdkError,
    types::{AttributeValue, ReturnValue},
    Client as DynamoDbClient,
};
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_dynamo::{from_item, from_items, to_item};
use strum::{Display, EnumString};

pub use error::{TripStorageError, TripStorageResult};

/// Attribute names for the trips table
#[derive(Debug, Clone, Copy, Display)]
pub enum TripAttribute {
    /// Owner identifier (Partition Key)
    #[strum(serialize = "UserID")]
    UserId,
    /// Trip identifier (Sort Key), generated by the client
    #[strum(serialize = "TripID")]
    TripId,
    /// Trip title
    Title,
    /// Free-text location
    Location,
    /// Free-text description
    Description,
    /// Ordered photo keys, the first one is the cover
    ImageUrls,
    /// Start date (`YYYY-MM-DD`)
    StartDate,
    /// End date (`YYYY-MM-DD`)
    EndDate,
    /// `public` or `private`
    Visibility,
    /// Creation timestamp (RFC 3339)
    CreatedAt,
    /// Map pins
    Locations,
}

/// Whether a trip is discoverable by users other than its owner
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    /// Listed on the public browse page
    #[default]
    Public,
    /// Only visible to the owner
    Private,
}

/// A labelled map pin attached to a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationPin {
    /// Client-generated pin identifier
    pub id: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Display label
    pub label: String,
}

/// Trip record as stored in the trips table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Trip {
    /// Owner identifier (Partition Key)
    #[serde(rename = "UserID")]
    pub user_id: String,
    /// Trip identifier (Sort Key)
    #[serde(rename = "TripID")]
    pub trip_id: String,
    /// Trip title
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-text location
    #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-text description
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered photo keys (or legacy URLs); the first entry is the cover photo
    #[serde(rename = "ImageUrls", default)]
    pub image_urls: Vec<String>,
    /// Start date
    #[serde(rename = "StartDate", default)]
    pub start_date: Option<NaiveDate>,
    /// End date
    #[serde(rename = "EndDate", default)]
    pub end_date: Option<NaiveDate>,
    /// Visibility, defaults to public
    #[serde(rename = "Visibility", default)]
    pub visibility: Visibility,
    /// Creation timestamp
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// Optional map pins
    #[serde(rename = "Locations", default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<LocationPin>>,
}

impl Trip {
    /// The cover photo, if the trip has any photos
    #[must_use]
    pub fn cover_photo(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Operations the handlers need from the trips table
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Writes the full record, overwriting any existing trip with the same key
    async fn put(&self, trip: &Trip) -> TripStorageResult<()>;

    /// Gets a single trip by owner and trip id
    async fn get_one(&self, user_id: &str, trip_id: &str) -> TripStorageResult<Option<Trip>>;

    /// Lists every trip owned by `user_id`, regardless of visibility
    async fn list_by_user(&self, user_id: &str) -> TripStorageResult<Vec<Trip>>;

    /// Lists every public trip across all owners
    async fn list_public(&self) -> TripStorageResult<Vec<Trip>>;

    /// Sets the visibility of an existing trip and returns the updated record
    ///
    /// Returns `TripStorageError::TripNotFound` if the trip does not exist.
    async fn update_visibility(
        &self,
        user_id: &str,
        trip_id: &str,
        visibility: Visibility,
    ) -> TripStorageResult<Trip>;

    /// Deletes an existing trip
    ///
    /// Returns `TripStorageError::TripNotFound` if the trip does not exist.
    async fn delete(&self, user_id: &str, trip_id: &str) -> TripStorageResult<()>;
}

/// Trip storage client for Dynamo DB operations
pub struct TripStorage {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
}

impl TripStorage {
    /// Creates a new trip storage client
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured Dynamo DB client
    /// * `table_name` - Dynamo DB table name for trips
    #[must_use]
    pub const fn new(dynamodb_client: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self {
            dynamodb_client,
            table_name,
        }
    }

    fn key(user_id: &str, trip_id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                TripAttribute::UserId.to_string(),
                AttributeValue::S(user_id.to_string()),
            ),
            (
                TripAttribute::TripId.to_string(),
                AttributeValue::S(trip_id.to_string()),
            ),
        ])
    }
}

#[async_trait]
impl TripStore for TripStorage {
    async fn put(&self, trip: &Trip) -> TripStorageResult<()> {
        let item = to_item(trip)?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    async fn get_one(&self, user_id: &str, trip_id: &str) -> TripStorageResult<Option<Trip>> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id, trip_id)))
            .send()
            .await?;

        response
            .item
            .map(from_item)
            .transpose()
            .map_err(TripStorageError::from)
    }

    async fn list_by_user(&self, user_id: &str) -> TripStorageResult<Vec<Trip>> {
        let mut trips = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let response = self
                .dynamodb_client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("#user_id = :user_id")
                .expression_attribute_names("#user_id", TripAttribute::UserId.to_string())
                .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await?;

            trips.extend(from_items::<_, Trip>(response.items.unwrap_or_default())?);

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        Ok(trips)
    }

    async fn list_public(&self) -> TripStorageResult<Vec<Trip>> {
        let mut trips = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let response = self
                .dynamodb_client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("#visibility = :visibility")
                .expression_attribute_names("#visibility", TripAttribute::Visibility.to_string())
                .expression_attribute_values(
                    ":visibility",
                    AttributeValue::S(Visibility::Public.to_string()),
                )
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await?;

            trips.extend(from_items::<_, Trip>(response.items.unwrap_or_default())?);

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(count = trips.len(), "Scanned public trips");

        Ok(trips)
    }

    async fn update_visibility(
        &self,
        user_id: &str,
        trip_id: &str,
        visibility: Visibility,
    ) -> TripStorageResult<Trip> {
        let response = self
            .dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id, trip_id)))
            .update_expression("SET #visibility = :visibility")
            .condition_expression("attribute_exists(#trip_id)")
            .expression_attribute_names("#visibility", TripAttribute::Visibility.to_string())
            .expression_attribute_names("#trip_id", TripAttribute::TripId.to_string())
            .expression_attribute_values(":visibility", AttributeValue::S(visibility.to_string()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    TripStorageError::TripNotFound
                } else {
                    err.into()
                }
            })?;

        let attributes = response.attributes.ok_or(TripStorageError::TripNotFound)?;

        Ok(from_item(attributes)?)
    }

    async fn delete(&self, user_id: &str, trip_id: &str) -> TripStorageResult<()> {
        self.dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id, trip_id)))
            .condition_expression("attribute_exists(#trip_id)")
            .expression_attribute_names("#trip_id", TripAttribute::TripId.to_string())
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    TripStorageError::TripNotFound
                } else {
                    err.into()
                }
            })?;

        Ok(())
    }
}
