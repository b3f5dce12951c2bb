//! Error types for trip storage operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    delete_item::DeleteItemError, get_item::GetItemError, put_item::PutItemError,
    query::QueryError, scan::ScanError, update_item::UpdateItemError,
};
use thiserror::Error;

/// Result type alias for trip storage operations
pub type TripStorageResult<T> = Result<T, TripStorageError>;

/// Storage error types for trip operations
#[derive(Debug, Error)]
pub enum TripStorageError {
    /// Failed to insert trip into `DynamoDB`
    #[error("Failed to insert trip into DynamoDB: {0:?}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to get trip from `DynamoDB`
    #[error("Failed to get trip from DynamoDB: {0:?}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to query trips from `DynamoDB`
    #[error("Failed to query trips from DynamoDB: {0:?}")]
    DynamoDbQueryError(#[from] SdkError<QueryError>),

    /// Failed to scan trips from `DynamoDB`
    #[error("Failed to scan trips from DynamoDB: {0:?}")]
    DynamoDbScanError(#[from] SdkError<ScanError>),

    /// Failed to update trip in `DynamoDB`
    #[error("Failed to update trip in DynamoDB: {0:?}")]
    DynamoDbUpdateError(#[from] SdkError<UpdateItemError>),

    /// Failed to delete trip from `DynamoDB`
    #[error("Failed to delete trip from DynamoDB: {0:?}")]
    DynamoDbDeleteError(#[from] SdkError<DeleteItemError>),

    /// The conditional check on (`UserID`, `TripID`) failed
    #[error("Trip not found")]
    TripNotFound,

    /// Failed to convert a trip to or from a `DynamoDB` item
    #[error("Failed to parse trip: {0}")]
    SerializationError(String),
}

impl From<serde_dynamo::Error> for TripStorageError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
