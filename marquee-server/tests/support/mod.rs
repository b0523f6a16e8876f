//! Shared fixtures: in-memory repository doubles and a test app builder.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};

use marquee_core::database::ports::{
    MovieRepository, MovieViewRepository, UserRepository,
};
use marquee_core::error::{CatalogError, Result};
use marquee_core::query::types::{MovieFilters, Pagination};
use marquee_core::rate_limit::RateLimiter;
use marquee_core::CatalogUnitOfWork;
use marquee_model::{
    Category, Movie, MovieView, MovieWithCategory, NewMovie, NewUser, User,
    UserWithViews,
};
use marquee_server::infra::config::{Config, RateLimitSettings};
use marquee_server::infra::middleware::rate_limit::MemoryRateLimiter;
use marquee_server::{create_app, AppState};

/// In-memory stand-in for the PostgreSQL repositories.
///
/// Enforces the same constraints the schema does: movies and views point
/// at existing rows, emails are unique, and marking a view upserts on the
/// (user, movie) pair. Rows keep sequential ids starting at 1.
#[derive(Default)]
pub struct MemoryCatalog {
    categories: Mutex<Vec<Category>>,
    movies: Mutex<Vec<Movie>>,
    users: Mutex<Vec<User>>,
    views: Mutex<Vec<MovieView>>,
}

impl MemoryCatalog {
    /// A catalog seeded with the same categories the migrations install.
    pub fn new() -> Self {
        let catalog = Self::default();
        {
            let mut categories = catalog.categories.lock().unwrap();
            for (id, name) in
                [(1, "Horror"), (2, "Thriller"), (3, "Drama"), (4, "Comedy")]
            {
                categories.push(Category { id, name: name.to_string() });
            }
        }
        catalog
    }

    pub fn add_category(&self, name: &str) -> Category {
        let mut categories = self.categories.lock().unwrap();
        let category = Category {
            id: categories.len() as i32 + 1,
            name: name.to_string(),
        };
        categories.push(category.clone());
        category
    }

    pub fn add_movie(
        &self,
        title: &str,
        category_id: i32,
        release_date: DateTime<Utc>,
    ) -> Movie {
        let mut movies = self.movies.lock().unwrap();
        let movie = Movie {
            id: movies.len() as i32 + 1,
            title: title.to_string(),
            description: None,
            release_date,
            category_id,
        };
        movies.push(movie.clone());
        movie
    }

    pub fn add_user(&self, name: &str, email: &str) -> User {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i32 + 1,
            name: name.to_string(),
            email: email.to_string(),
        };
        users.push(user.clone());
        user
    }

    pub fn movie_count(&self) -> usize {
        self.movies.lock().unwrap().len()
    }

    pub fn view_count(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    pub fn view_for(&self, user_id: i32, movie_id: i32) -> Option<MovieView> {
        self.views
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.user_id == user_id && v.movie_id == movie_id)
            .cloned()
    }

    fn category(&self, id: i32) -> Option<Category> {
        self.categories.lock().unwrap().iter().find(|c| c.id == id).cloned()
    }

    fn with_category(&self, movie: Movie) -> MovieWithCategory {
        let category = self
            .category(movie.category_id)
            .unwrap_or_else(|| panic!("movie {} has no category", movie.id));
        MovieWithCategory { movie, category }
    }

    fn filtered(&self, filters: &MovieFilters) -> Vec<Movie> {
        let movies = self.movies.lock().unwrap();
        movies
            .iter()
            .filter(|m| {
                filters.title.as_ref().is_none_or(|t| {
                    m.title.to_lowercase().contains(&t.to_lowercase())
                })
            })
            .filter(|m| {
                filters.category_id.is_none_or(|id| m.category_id == id)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MovieRepository for MemoryCatalog {
    async fn create_movie(&self, movie: &NewMovie) -> Result<Movie> {
        if self.category(movie.category_id).is_none() {
            return Err(CatalogError::Validation(format!(
                "Category {} does not exist",
                movie.category_id
            )));
        }

        let mut movies = self.movies.lock().unwrap();
        let stored = Movie {
            id: movies.len() as i32 + 1,
            title: movie.title.clone(),
            description: movie.description.clone(),
            release_date: movie.release_date,
            category_id: movie.category_id,
        };
        movies.push(stored.clone());
        Ok(stored)
    }

    async fn list_movies(
        &self,
        filters: &MovieFilters,
        pagination: &Pagination,
        order_by_date: bool,
    ) -> Result<Vec<MovieWithCategory>> {
        let mut rows = self.filtered(filters);
        if order_by_date {
            rows.sort_by(|a, b| b.release_date.cmp(&a.release_date));
        } else {
            rows.sort_by_key(|m| m.id);
        }

        Ok(rows
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .map(|m| self.with_category(m))
            .collect())
    }

    async fn count_movies(&self, filters: &MovieFilters) -> Result<i64> {
        Ok(self.filtered(filters).len() as i64)
    }

    async fn list_released_since(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<MovieWithCategory>> {
        let mut rows: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.release_date >= threshold)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.release_date.cmp(&a.release_date));

        Ok(rows.into_iter().map(|m| self.with_category(m)).collect())
    }
}

#[async_trait]
impl UserRepository for MemoryCatalog {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(CatalogError::Conflict(
                "Email already exists".to_string(),
            ));
        }

        let stored = User {
            id: users.len() as i32 + 1,
            name: user.name.clone(),
            email: user.email.clone(),
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn list_users_with_views(&self) -> Result<Vec<UserWithViews>> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by_key(|u| u.id);

        let views = self.views.lock().unwrap().clone();
        let mut by_user: HashMap<i32, Vec<MovieView>> = HashMap::new();
        for view in views {
            by_user.entry(view.user_id).or_default().push(view);
        }

        let movies = self.movies.lock().unwrap().clone();
        Ok(users
            .into_iter()
            .map(|user| {
                let mut user_views =
                    by_user.remove(&user.id).unwrap_or_default();
                user_views.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));

                let viewed = user_views
                    .into_iter()
                    .filter_map(|view| {
                        movies.iter().find(|m| m.id == view.movie_id).cloned()
                    })
                    .map(|m| self.with_category(m))
                    .collect();

                UserWithViews { user, viewed }
            })
            .collect())
    }
}

#[async_trait]
impl MovieViewRepository for MemoryCatalog {
    async fn mark_viewed(
        &self,
        user_id: i32,
        movie_id: i32,
        viewed_at: DateTime<Utc>,
    ) -> Result<MovieView> {
        if !self.users.lock().unwrap().iter().any(|u| u.id == user_id) {
            return Err(CatalogError::Validation(format!(
                "User {} does not exist",
                user_id
            )));
        }
        if !self.movies.lock().unwrap().iter().any(|m| m.id == movie_id) {
            return Err(CatalogError::Validation(format!(
                "Movie {} does not exist",
                movie_id
            )));
        }

        let mut views = self.views.lock().unwrap();
        if let Some(existing) = views
            .iter_mut()
            .find(|v| v.user_id == user_id && v.movie_id == movie_id)
        {
            existing.viewed_at = viewed_at;
            return Ok(existing.clone());
        }

        let view = MovieView {
            id: views.len() as i32 + 1,
            user_id,
            movie_id,
            viewed_at,
        };
        views.push(view.clone());
        Ok(view)
    }
}

/// A running test server plus a handle on the backing store.
pub struct TestApp {
    pub server: TestServer,
    pub catalog: Arc<MemoryCatalog>,
}

/// App over in-memory repositories with the rate-limit gate disabled.
pub fn spawn_app() -> TestApp {
    spawn_app_with_rate_limit(RateLimitSettings {
        enabled: false,
        ..RateLimitSettings::default()
    })
}

/// App over in-memory repositories with the given gate settings and a
/// fresh sliding-window limiter.
pub fn spawn_app_with_rate_limit(rate_limit: RateLimitSettings) -> TestApp {
    let limiter = Arc::new(MemoryRateLimiter::new(rate_limit.window));
    spawn_app_with_limiter(rate_limit, limiter)
}

/// Full control: gate settings plus the limiter backend itself.
pub fn spawn_app_with_limiter(
    rate_limit: RateLimitSettings,
    rate_limiter: Arc<dyn RateLimiter>,
) -> TestApp {
    let catalog = Arc::new(MemoryCatalog::new());
    let unit_of_work = Arc::new(CatalogUnitOfWork::new(
        catalog.clone(),
        catalog.clone(),
        catalog.clone(),
    ));

    let config = Arc::new(Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: None,
        cors_allowed_origins: Vec::new(),
        rate_limit,
    });

    let state = AppState {
        unit_of_work,
        postgres: None,
        config,
        rate_limiter,
    };

    let server = TestServer::new(create_app(state))
        .expect("test server should start");
    TestApp { server, catalog }
}
