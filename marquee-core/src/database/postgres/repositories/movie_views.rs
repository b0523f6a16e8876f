use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use marquee_model::MovieView;

use crate::database::ports::movie_views::MovieViewRepository;
use crate::error::{CatalogError, Result};

/// PostgreSQL-backed implementation of the `MovieViewRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresMovieViewRepository {
    pool: PgPool,
}

impl PostgresMovieViewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MovieViewRow {
    id: i32,
    user_id: i32,
    movie_id: i32,
    viewed_at: DateTime<Utc>,
}

impl From<MovieViewRow> for MovieView {
    fn from(row: MovieViewRow) -> Self {
        MovieView {
            id: row.id,
            user_id: row.user_id,
            movie_id: row.movie_id,
            viewed_at: row.viewed_at,
        }
    }
}

#[async_trait]
impl MovieViewRepository for PostgresMovieViewRepository {
    async fn mark_viewed(
        &self,
        user_id: i32,
        movie_id: i32,
        viewed_at: DateTime<Utc>,
    ) -> Result<MovieView> {
        // Single constrained write; the unique pair constraint makes
        // concurrent calls for the same pair converge on one row.
        let row = sqlx::query_as::<_, MovieViewRow>(
            r#"
            INSERT INTO movie_views (user_id, movie_id, viewed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, movie_id) DO UPDATE SET
                viewed_at = EXCLUDED.viewed_at
            RETURNING id, user_id, movie_id, viewed_at
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(viewed_at)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint() == Some("movie_views_user_id_fkey") {
                    return CatalogError::Validation(format!(
                        "User {} does not exist",
                        user_id
                    ));
                }
                if db_err.constraint() == Some("movie_views_movie_id_fkey") {
                    return CatalogError::Validation(format!(
                        "Movie {} does not exist",
                        movie_id
                    ));
                }
            }
            CatalogError::Internal(format!("Failed to record view: {}", e))
        })?;

        Ok(row.into())
    }
}
