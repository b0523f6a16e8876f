use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use marquee_model::{
    Category, Movie, MovieWithCategory, NewUser, User, UserWithViews,
};

use crate::database::ports::users::UserRepository;
use crate::error::{CatalogError, Result};

/// PostgreSQL-backed implementation of the `UserRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User { id: row.id, name: row.name, email: row.email }
    }
}

/// One viewed movie joined through `movie_views`, tagged with the viewer.
#[derive(Debug, sqlx::FromRow)]
struct ViewedMovieRow {
    user_id: i32,
    id: i32,
    title: String,
    description: Option<String>,
    release_date: DateTime<Utc>,
    category_id: i32,
    category_name: String,
}

impl From<ViewedMovieRow> for MovieWithCategory {
    fn from(row: ViewedMovieRow) -> Self {
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

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint() == Some("users_email_key") {
                    return CatalogError::Conflict(
                        "Email already exists".to_string(),
                    );
                }
            }
            CatalogError::Internal(format!("Failed to create user: {}", e))
        })?;

        info!("Created user: {} ({})", row.name, row.id);
        Ok(row.into())
    }

    async fn list_users_with_views(&self) -> Result<Vec<UserWithViews>> {
        let users = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email FROM users ORDER BY id ASC",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!("Failed to list users: {}", e))
        })?;

        let view_rows = sqlx::query_as::<_, ViewedMovieRow>(
            r#"
            SELECT mv.user_id, m.id, m.title, m.description, m.release_date,
                   m.category_id, c.name AS category_name
            FROM movie_views mv
            INNER JOIN movies m ON m.id = mv.movie_id
            INNER JOIN categories c ON c.id = m.category_id
            ORDER BY mv.user_id ASC, mv.viewed_at DESC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            CatalogError::Internal(format!(
                "Failed to load viewed movies: {}",
                e
            ))
        })?;

        // Rows arrive sorted by (user, recency); grouping preserves that.
        let mut by_user: HashMap<i32, Vec<MovieWithCategory>> = HashMap::new();
        for row in view_rows {
            by_user.entry(row.user_id).or_default().push(row.into());
        }

        Ok(users
            .into_iter()
            .map(|u| UserWithViews {
                viewed: by_user.remove(&u.id).unwrap_or_default(),
                user: u.into(),
            })
            .collect())
    }
}
