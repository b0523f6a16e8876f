//! User endpoints: creation, viewing history, and the view-marking command.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use marquee_model::{NewUser, User, UserWithViewedMovies};

use crate::AppState;
use crate::errors::{AppError, AppResult};

/// Body for `POST /users`. Fields land optional so a missing one is a
/// handler-level 400 rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    name: Option<String>,
    email: Option<String>,
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let name = request
        .name
        .ok_or_else(|| AppError::bad_request("name is required"))?;
    let email = request
        .email
        .ok_or_else(|| AppError::bad_request("email is required"))?;

    let user = state
        .engagement_tracker()
        .create_user(NewUser { name, email })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/viewed-movies`
pub async fn users_with_viewed_movies(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserWithViewedMovies>>> {
    let users = state.engagement_tracker().users_with_viewed_movies().await?;
    Ok(Json(users))
}

/// `POST /users/{userId}/view-movie/{movieId}`
///
/// Idempotent: repeated calls acknowledge identically while the store
/// keeps a single row per pair. Non-numeric path segments are rejected by
/// the extractor with a 400 before this runs.
pub async fn mark_movie_viewed(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> AppResult<Json<Value>> {
    state.engagement_tracker().mark_viewed(user_id, movie_id).await?;
    Ok(Json(json!({ "message": "Movie marked as viewed" })))
}
