pub mod category_service;
pub mod count_aggregator;
pub mod cycle_guard;
pub mod slug_assigner;
pub mod tree_navigator;

pub use category_service::CategoryService;
