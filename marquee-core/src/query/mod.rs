//! Typed query construction for the listing engine.

pub mod types;

pub use types::{MovieFilters, MovieQuery, Pagination};
