use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Days, Utc};

use marquee_model::{Movie, MovieViewModel, NewMovie, PaginatedResult};

use crate::database::ports::movies::MovieRepository;
use crate::error::{CatalogError, Result};
use crate::query::types::MovieQuery;

/// Days a movie counts as a new release after its release date.
pub const NEW_RELEASE_WINDOW_DAYS: u64 = 21;

/// The listing engine: filtered/paginated queries and the new-release
/// window, shaped into view models.
#[derive(Clone)]
pub struct MovieCatalog {
    movies: Arc<dyn MovieRepository>,
}

impl fmt::Debug for MovieCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovieCatalog")
            .field("movies", &type_name_of_val(self.movies.as_ref()))
            .finish()
    }
}

impl MovieCatalog {
    pub fn new(movies: Arc<dyn MovieRepository>) -> Self {
        Self { movies }
    }

    /// One page of movies under `query` plus paging metadata.
    ///
    /// The page fetch and the total count run concurrently against the same
    /// predicate. A page beyond the last yields empty `data` with the
    /// metadata still correct; it is not an error.
    pub async fn list_movies(
        &self,
        query: &MovieQuery,
    ) -> Result<PaginatedResult<MovieViewModel>> {
        let (rows, total) = tokio::try_join!(
            self.movies.list_movies(
                &query.filters,
                &query.pagination,
                query.order_by_date,
            ),
            self.movies.count_movies(&query.filters),
        )?;

        let data = rows.into_iter().map(Into::into).collect();
        Ok(PaginatedResult::new(
            data,
            total,
            query.pagination.page,
            query.pagination.limit,
        ))
    }

    /// Movies released within the last 21 calendar days, newest first.
    /// The window boundary is inclusive.
    pub async fn new_releases(&self) -> Result<Vec<MovieViewModel>> {
        let threshold = new_release_threshold(Utc::now());
        let rows = self.movies.list_released_since(threshold).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Validate and persist a new movie, returning the stored row verbatim.
    pub async fn create_movie(&self, movie: NewMovie) -> Result<Movie> {
        if movie.title.trim().is_empty() {
            return Err(CatalogError::Validation(
                "title must not be empty".to_string(),
            ));
        }

        self.movies.create_movie(&movie).await
    }
}

/// Start of the new-release window: `now` minus the window in calendar
/// days. Day subtraction, not a fixed duration, so month boundaries are
/// respected.
pub fn new_release_threshold(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_days(Days::new(NEW_RELEASE_WINDOW_DAYS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
