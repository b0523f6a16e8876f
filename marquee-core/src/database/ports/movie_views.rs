use async_trait::async_trait;
use chrono::{DateTime, Utc};

use marquee_model::MovieView;

use crate::error::Result;

/// Typed access to the engagement table.
#[async_trait]
pub trait MovieViewRepository: Send + Sync {
    /// Record that `user_id` viewed `movie_id` at `viewed_at`, atomically:
    /// insert on first call, refresh `viewed_at` on every later call for
    /// the same pair. At most one row ever exists per pair; the store's
    /// unique constraint is the correctness mechanism under concurrency.
    /// Returns the upserted row.
    async fn mark_viewed(
        &self,
        user_id: i32,
        movie_id: i32,
        viewed_at: DateTime<Utc>,
    ) -> Result<MovieView>;
}
