use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use marquee_model::{Category, Movie, MovieWithCategory, NewMovie};

use crate::database::ports::movies::MovieRepository;
use crate::error::{CatalogError, Result};
use crate::query::types::{MovieFilters, Pagination};

/// Select head shared by every movie read; the inner join guarantees no
/// movie with an unresolvable category is ever returned.
const MOVIE_SELECT: &str = "SELECT m.id, m.title, m.description, m.release_date, m.category_id, \
     c.name AS category_name \
     FROM movies m \
     INNER JOIN categories c ON c.id = m.category_id";

/// PostgreSQL-backed implementation of the `MovieRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MovieRow {
    id: i32,
    title: String,
    description: Option<String>,
    release_date: DateTime<Utc>,
    category_id: i32,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            description: row.description,
            release_date: row.release_date,
            category_id: row.category_id,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MovieCategoryRow {
    id: i32,
    title: String,
    description: Option<String>,
    release_date: DateTime<Utc>,
    category_id: i32,
    category_name: String,
}

impl From<MovieCategoryRow> for MovieWithCategory {
    fn from(row: MovieCategoryRow) -> Self {
        MovieWithCategory {
            movie: Movie {
                id: row.id,
                title: row.title,
                description: row.description,
                release_date: row.release_date,
                category_id: row.category_id,
            },
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
        }
    }
}

/// Appends the filter predicate. The same clauses back both the page fetch
/// and the count so the two always agree.
fn push_filters(sql: &mut QueryBuilder<'_, Postgres>, filters: &MovieFilters) {
    if let Some(title) = &filters.title {
        let pattern = format!("%{}%", escape_like_literal(title));
        sql.push(" AND m.title ILIKE ");
        sql.push_bind(pattern);
        sql.push(" ESCAPE E'\\\\'");
    }
    if let Some(category_id) = filters.category_id {
        sql.push(" AND m.category_id = ");
        sql.push_bind(category_id);
    }
}

fn escape_like_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            other => out.push(other),
        }
    }
    out
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn create_movie(&self, movie: &NewMovie) -> Result<Movie> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            INSERT INTO movies (title, description, release_date, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, release_date, category_id
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.release_date)
        .bind(movie.category_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint() == Some("movies_category_id_fkey") {
                    return CatalogError::Validation(format!(
                        "Category {} does not exist",
                        movie.category_id
                    ));
                }
            }
            CatalogError::Internal(format!("Failed to create movie: {}", e))
        })?;

        info!("Created movie: {} ({})", row.title, row.id);
        Ok(row.into())
    }

    async fn list_movies(
        &self,
        filters: &MovieFilters,
        pagination: &Pagination,
        order_by_date: bool,
    ) -> Result<Vec<MovieWithCategory>> {
        let mut sql = QueryBuilder::<Postgres>::new(MOVIE_SELECT);
        sql.push(" WHERE 1=1");
        push_filters(&mut sql, filters);
        if order_by_date {
            sql.push(" ORDER BY m.release_date DESC");
        } else {
            sql.push(" ORDER BY m.id ASC");
        }
        sql.push(" LIMIT ");
        sql.push_bind(pagination.limit);
        sql.push(" OFFSET ");
        sql.push_bind(pagination.offset());

        let rows = sql
            .build_query_as::<MovieCategoryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Failed to list movies: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_movies(&self, filters: &MovieFilters) -> Result<i64> {
        let mut sql = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM movies m WHERE 1=1",
        );
        push_filters(&mut sql, filters);

        sql.build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Failed to count movies: {}", e))
            })
    }

    async fn list_released_since(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<MovieWithCategory>> {
        let sql = format!(
            "{} WHERE m.release_date >= $1 ORDER BY m.release_date DESC",
            MOVIE_SELECT
        );

        let rows = sqlx::query_as::<_, MovieCategoryRow>(&sql)
            .bind(threshold)
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "Failed to list new releases: {}",
                    e
                ))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
