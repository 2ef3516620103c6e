//! Resources (articles): publishing, SEO scoring and galleries.
//!
//! Category counts are recomputed inside the same store session as every
//! write that changes what a category shows.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::ResourceService;
