//! Footprints travel journal backend service

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// S3 photo storage and presigning
pub mod media_storage;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server startup
pub mod server;

/// Environment, errors and extractors
pub mod types;
