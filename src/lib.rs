//! Position browsing toolkit for the internship placement backend:
//! filtering and ordering of listings, geocoding with a persistent cache,
//! and a typed client for the REST API.

pub mod api;
pub mod config;
pub mod dates;
pub mod filters;
pub mod geo;
pub mod models;
