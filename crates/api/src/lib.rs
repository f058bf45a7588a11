//! HTTP API layer for univan.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: trips, polls, votes, registries, authentication
//! - **Extractors**: bearer-token authentication and admin gating
//! - **Middleware**: request authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
