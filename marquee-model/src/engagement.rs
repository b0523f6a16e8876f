use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::MovieWithCategory;

/// A viewer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Engagement fact: one row per `(user_id, movie_id)` pair, with
/// `viewed_at` always reflecting the most recent marking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub viewed_at: DateTime<Utc>,
}

/// A user together with the movies they have viewed, persistence-shaped.
/// The engagement tracker turns this into wire view models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithViews {
    pub user: User,
    pub viewed: Vec<MovieWithCategory>,
}
