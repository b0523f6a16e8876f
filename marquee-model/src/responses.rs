//! Read-shaped view models. Computed per response, never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, MovieWithCategory};
use crate::engagement::UserWithViews;

/// A movie with its category embedded, as clients see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieViewModel {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_date: DateTime<Utc>,
    pub category: Category,
}

impl From<MovieWithCategory> for MovieViewModel {
    fn from(row: MovieWithCategory) -> Self {
        Self {
            id: row.movie.id,
            title: row.movie.title,
            description: row.movie.description,
            release_date: row.movie.release_date,
            category: row.category,
        }
    }
}

/// A user with every movie they have marked as viewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithViewedMovies {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub viewed_movies: Vec<MovieViewModel>,
}

impl From<UserWithViews> for UserWithViewedMovies {
    fn from(row: UserWithViews) -> Self {
        Self {
            id: row.user.id,
            name: row.user.name,
            email: row.user.email,
            viewed_movies: row.viewed.into_iter().map(Into::into).collect(),
        }
    }
}

/// Pagination envelope metadata. `page` and `limit` echo the effective
/// (defaulted) inputs, `total` counts the full filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PageMeta {
    /// Computes `total_pages = ceil(total / limit)` in integer arithmetic.
    /// `limit` is at least 1 by construction of the query types; the
    /// rounding term is added with `saturating_add`, so extreme
    /// client-supplied limits cannot overflow it.
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 { total.saturating_add(limit - 1) / limit } else { 0 };
        Self { total, page, limit, total_pages }
    }
}

/// One page of results plus the metadata needed to page further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResult<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self { data, meta: PageMeta::new(total, page, limit) }
    }
}
