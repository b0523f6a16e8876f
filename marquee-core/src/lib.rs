//! Core logic for the Marquee catalog service.
//!
//! Layout mirrors the request path: [`query`] holds the typed filter
//! specification handlers build from raw parameters, [`catalog`] holds the
//! application services (listing engine and engagement tracker),
//! [`database`] holds the repository ports and their PostgreSQL
//! implementations, and [`application`] bundles the ports into the unit of
//! work injected at startup. [`rate_limit`] is the backend-agnostic model
//! for the request gate in front of everything.

pub mod application;
pub mod catalog;
pub mod database;
pub mod error;
pub mod query;
pub mod rate_limit;

/// Embedded schema migrations, applied at startup and by `db migrate`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use application::unit_of_work::CatalogUnitOfWork;
pub use error::{CatalogError, Result};
