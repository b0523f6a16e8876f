use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use crate::database::ports::{
    movie_views::MovieViewRepository, movies::MovieRepository,
    users::UserRepository,
};
use crate::database::postgres::repositories::{
    PostgresMovieRepository, PostgresMovieViewRepository,
    PostgresUserRepository,
};

/// Aggregates the repository ports used by application services.
///
/// Constructed once at startup and passed into components explicitly, so
/// there is no hidden process-wide persistence handle and tests can
/// substitute in-memory ports.
#[derive(Clone)]
pub struct CatalogUnitOfWork {
    pub movies: Arc<dyn MovieRepository>,
    pub users: Arc<dyn UserRepository>,
    pub movie_views: Arc<dyn MovieViewRepository>,
}

impl fmt::Debug for CatalogUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogUnitOfWork")
            .field("movies", &type_name_of_val(self.movies.as_ref()))
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field(
                "movie_views",
                &type_name_of_val(self.movie_views.as_ref()),
            )
            .finish()
    }
}

impl CatalogUnitOfWork {
    /// Assemble a unit of work from explicit ports (test doubles included).
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        users: Arc<dyn UserRepository>,
        movie_views: Arc<dyn MovieViewRepository>,
    ) -> Self {
        Self { movies, users, movie_views }
    }

    /// Wire every port to its PostgreSQL implementation over `pool`.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            movies: Arc::new(PostgresMovieRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            movie_views: Arc::new(PostgresMovieViewRepository::new(pool)),
        }
    }
}
