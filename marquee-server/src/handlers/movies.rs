//! Movie endpoints: creation, the filtered listing, and new releases.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use marquee_core::query::types::{MovieFilters, MovieQuery, Pagination};
use marquee_model::{Movie, MovieViewModel, NewMovie, PaginatedResult};

use crate::AppState;
use crate::errors::{AppError, AppResult};

/// Query parameters for `GET /movies`, captured raw.
///
/// Parsing is permissive: anything absent or unusable falls back to its
/// default instead of erroring, so a garbled `page=abc` still returns the
/// first page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMoviesParams {
    page: Option<String>,
    limit: Option<String>,
    title: Option<String>,
    category_id: Option<String>,
    order_by_date: Option<String>,
}

impl ListMoviesParams {
    /// Lower the raw parameters into the typed query.
    ///
    /// Page and limit clamp to 1-based defaults, a non-numeric
    /// `categoryId` drops that filter while any parsed integer binds (an
    /// id matching no category yields an empty page, not the full
    /// catalog), and ordering by release date is on unless `orderByDate`
    /// is literally `false`.
    fn into_query(self) -> MovieQuery {
        let page = self.page.as_deref().and_then(|raw| raw.parse().ok());
        let limit = self.limit.as_deref().and_then(|raw| raw.parse().ok());
        let category_id =
            self.category_id.as_deref().and_then(|raw| raw.parse::<i32>().ok());
        let title = self.title.filter(|t| !t.is_empty());

        MovieQuery {
            filters: MovieFilters { title, category_id },
            pagination: Pagination::clamped(page, limit),
            order_by_date: self.order_by_date.as_deref() != Some("false"),
        }
    }
}

/// `GET /movies`
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<ListMoviesParams>,
) -> AppResult<Json<PaginatedResult<MovieViewModel>>> {
    let query = params.into_query();
    let page = state.movie_catalog().list_movies(&query).await?;
    Ok(Json(page))
}

/// `GET /movies/new-releases`
pub async fn new_releases(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MovieViewModel>>> {
    let movies = state.movie_catalog().new_releases().await?;
    Ok(Json(movies))
}

/// Body for `POST /movies`. Fields land optional so a missing one is a
/// handler-level 400 rather than a body rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    title: Option<String>,
    description: Option<String>,
    release_date: Option<String>,
    category_id: Option<i32>,
}

/// `POST /movies`
pub async fn create_movie(
    State(state): State<AppState>,
    Json(request): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let title = request
        .title
        .ok_or_else(|| AppError::bad_request("title is required"))?;
    let raw_date = request
        .release_date
        .ok_or_else(|| AppError::bad_request("releaseDate is required"))?;
    let release_date = raw_date.parse::<DateTime<Utc>>().map_err(|_| {
        AppError::bad_request("releaseDate must be a valid RFC 3339 date-time")
    })?;
    let category_id = request
        .category_id
        .ok_or_else(|| AppError::bad_request("categoryId is required"))?;

    let movie = state
        .movie_catalog()
        .create_movie(NewMovie {
            title,
            description: request.description,
            release_date,
            category_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(movie)))
}
