use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A content genre. Seeded once at schema setup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// A catalog entry as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_date: DateTime<Utc>,
    pub category_id: i32,
}

/// Payload for creating a movie, validated before it reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: String,
    pub description: Option<String>,
    pub release_date: DateTime<Utc>,
    pub category_id: i32,
}

/// A movie joined with its category, as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieWithCategory {
    pub movie: Movie,
    pub category: Category,
}
