//! Application plumbing shared by every feature: configuration, database
//! pool, error type, request extractors, HTTP middleware and OpenAPI docs.

pub mod config;
pub mod database;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod openapi;
