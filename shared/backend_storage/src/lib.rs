//! Backend storage services for Footprints
//!
//! This crate holds the `DynamoDB`-backed trip table shared by the backend
//! handlers, along with the trip record types stored in it.

pub mod trip;
