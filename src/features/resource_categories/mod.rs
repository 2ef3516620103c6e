//! Resource category tree.
//!
//! | Module | Role |
//! |---|---|
//! | `store` | record store traits, PostgreSQL sessions (and an in-memory store for tests) |
//! | `services::slug_assigner` | unique slug per category |
//! | `services::cycle_guard` | rejects parent changes that would close a loop |
//! | `services::tree_navigator` | ancestors, descendants, level, breadcrumb |
//! | `services::count_aggregator` | recursive published-resource counts |
//! | `services::category_service` | create / update / delete orchestration |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::CategoryService;
