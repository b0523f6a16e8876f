//! Shared state handed to every handler.

use std::fmt;
use std::sync::Arc;

use marquee_core::CatalogUnitOfWork;
use marquee_core::catalog::{EngagementTracker, MovieCatalog};
use marquee_core::database::postgres::PostgresDatabase;
use marquee_core::rate_limit::RateLimiter;

use crate::infra::config::Config;

/// Application state shared across handlers and middleware. Cloned per
/// request; every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Repository bundle the services draw from.
    pub unit_of_work: Arc<CatalogUnitOfWork>,
    /// Live database handle, used by the health probe. Absent when the
    /// state is assembled over non-PostgreSQL repositories.
    pub postgres: Option<Arc<PostgresDatabase>>,
    /// Startup configuration.
    pub config: Arc<Config>,
    /// Backend enforcing the request gate.
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Listing service over the configured repositories.
    pub fn movie_catalog(&self) -> MovieCatalog {
        MovieCatalog::new(self.unit_of_work.movies.clone())
    }

    /// Engagement service over the configured repositories.
    pub fn engagement_tracker(&self) -> EngagementTracker {
        EngagementTracker::new(
            self.unit_of_work.users.clone(),
            self.unit_of_work.movie_views.clone(),
        )
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("unit_of_work", &self.unit_of_work)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
