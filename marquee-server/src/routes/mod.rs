//! Endpoint table.

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;
use crate::handlers::{health, movies, users};

/// Every API route, unprefixed, ready to sit behind the middleware stack.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .merge(movie_routes())
        .merge(user_routes())
}

fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", post(movies::create_movie).get(movies::list_movies))
        .route("/movies/new-releases", get(movies::new_releases))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/users/viewed-movies", get(users::users_with_viewed_movies))
        .route(
            "/users/{user_id}/view-movie/{movie_id}",
            post(users::mark_movie_viewed),
        )
}
