//! API route definitions

mod docs;
pub mod health;
pub mod media;
pub mod trips;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};

use crate::types::Environment;

/// Creates the router with all handler routes
///
/// `/docs` and `/openapi.json` are only mounted where the environment allows it.
pub fn handler(environment: &Environment) -> ApiRouter {
    let router = if environment.show_api_docs() {
        ApiRouter::new().merge(docs::handler())
    } else {
        ApiRouter::new()
    };

    router
        .api_route("/health", get(health::handler))
        .api_route(
            "/Trips",
            post(trips::create_trip)
                .get(trips::list_trips)
                .put(trips::update_trip)
                .delete(trips::delete_trip),
        )
        .api_route("/Trips/{id}", get(trips::get_trip))
        .api_route("/public-trips", get(trips::list_public_trips))
        .api_route("/upload", post(media::create_upload_urls))
        .api_route("/image-urls", post(media::create_image_urls))
}
