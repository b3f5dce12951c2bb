use std::sync::Arc;

use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{BehaviorVersion, Region},
    Client as S3Client,
};
use axum::{body::Body, http::Request, response::Response, Router};
use backend::{media_storage::MediaStorage, server, types::Environment};
use backend_storage::trip::TripStore;
use tower::ServiceExt;

use super::InMemoryTripStore;

pub const TEST_BUCKET: &str = "footprints-photos-test";

/// Initialize tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// S3 client with static credentials; presigning never touches the network
pub fn offline_s3_client() -> Arc<S3Client> {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new(
            "test",
            "test",
            None,
            None,
            "static",
        ))
        .endpoint_url("http://localhost:4566")
        .force_path_style(true)
        .build();

    Arc::new(S3Client::from_conf(config))
}

/// Router wired to an in-memory trip table and an offline S3 client
pub struct TestSetup {
    pub router: Router,
    pub trip_store: Arc<InMemoryTripStore>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryTripStore::default()))
    }

    pub fn with_store(trip_store: Arc<InMemoryTripStore>) -> Self {
        let router = Self::build_router(trip_store.clone());
        Self { router, trip_store }
    }

    pub fn build_router(trip_store: Arc<dyn TripStore>) -> Router {
        setup_test_env();

        let environment = Environment::Development {
            presign_expiry_override: None,
        };

        let media_storage = Arc::new(MediaStorage::new(
            offline_s3_client(),
            TEST_BUCKET.to_string(),
            environment.upload_url_expiry_secs(),
            environment.read_url_expiry_secs(),
        ));

        server::router(&environment, media_storage, trip_store)
    }

    pub async fn send_json_request(
        &self,
        method: &str,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method(method)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_json_request("POST", route, payload).await
    }

    pub async fn send_put_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_json_request("PUT", route, payload).await
    }

    pub async fn send_delete_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_json_request("DELETE", route, payload).await
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}

pub async fn parse_response_body(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;

    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&body).expect("Body is not JSON")
}
