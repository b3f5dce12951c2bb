use std::sync::Arc;
use std::time::Duration;

use aide::openapi::OpenApi;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        StatusCode,
    },
    Extension, Router,
};
use backend_storage::trip::TripStore;
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::routes;
use crate::{media_storage::MediaStorage, types::Environment};

/// Upper bound on handling a single request, presigning included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the application router with all layers and dependencies attached
#[must_use]
pub fn router(
    environment: &Environment,
    media_storage: Arc<MediaStorage>,
    trip_store: Arc<dyn TripStore>,
) -> Router {
    let mut openapi = OpenApi::default();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    routes::handler(environment)
        .finish_api_with(&mut openapi, |api| api.title("Footprints API"))
        .layer(Extension(openapi))
        .layer(Extension(media_storage))
        .layer(Extension(trip_store))
        .layer(cors)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if `PORT` is invalid or the server fails to start or bind
pub async fn start(
    environment: Environment,
    media_storage: Arc<MediaStorage>,
    trip_store: Arc<dyn TripStore>,
) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], environment.port()?));

    let router = router(&environment, media_storage, trip_store);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Footprints backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
