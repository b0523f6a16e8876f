//! PostgreSQL implementations of the repository ports. Each translates
//! store failures into [`crate::error::CatalogError`] so callers never see
//! a driver error code; constraint violations are discriminated by the
//! constraint names fixed in the migrations.

pub mod movie_views;
pub mod movies;
pub mod users;

pub use movie_views::PostgresMovieViewRepository;
pub use movies::PostgresMovieRepository;
pub use users::PostgresUserRepository;
