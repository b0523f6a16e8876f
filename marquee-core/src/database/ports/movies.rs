use async_trait::async_trait;
use chrono::{DateTime, Utc};

use marquee_model::{Movie, MovieWithCategory, NewMovie};

use crate::error::Result;
use crate::query::types::{MovieFilters, Pagination};

/// Typed access to the movie table and its category join.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert a movie and return the stored row, generated id included.
    /// A `category_id` referencing no category is a validation failure.
    async fn create_movie(&self, movie: &NewMovie) -> Result<Movie>;

    /// One page of movies matching `filters`, each joined with its
    /// category. Ordered by release date descending when `order_by_date`,
    /// otherwise by id ascending.
    async fn list_movies(
        &self,
        filters: &MovieFilters,
        pagination: &Pagination,
        order_by_date: bool,
    ) -> Result<Vec<MovieWithCategory>>;

    /// Total rows matching `filters`, ignoring pagination.
    async fn count_movies(&self, filters: &MovieFilters) -> Result<i64>;

    /// Every movie with `release_date >= threshold` (inclusive), newest
    /// first, unpaginated.
    async fn list_released_since(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<MovieWithCategory>>;
}
