//! Core data model definitions shared across Marquee crates.
//!
//! Entities mirror the persisted tables; the [`responses`] module holds the
//! read-shaped view models that cross the wire. Wire field names are
//! camelCase throughout.

pub mod catalog;
pub mod engagement;
pub mod responses;

// Intentionally curated re-exports for downstream consumers.
pub use catalog::{Category, Movie, MovieWithCategory, NewMovie};
pub use engagement::{MovieView, NewUser, User, UserWithViews};
pub use responses::{
    MovieViewModel, PageMeta, PaginatedResult, UserWithViewedMovies,
};
