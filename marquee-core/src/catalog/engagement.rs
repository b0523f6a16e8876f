use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use marquee_model::{NewUser, User, UserWithViewedMovies};

use crate::database::ports::{
    movie_views::MovieViewRepository, users::UserRepository,
};
use crate::error::{CatalogError, Result};

/// Viewer accounts and the idempotent view-marking command.
#[derive(Clone)]
pub struct EngagementTracker {
    users: Arc<dyn UserRepository>,
    movie_views: Arc<dyn MovieViewRepository>,
}

impl fmt::Debug for EngagementTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngagementTracker")
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field(
                "movie_views",
                &type_name_of_val(self.movie_views.as_ref()),
            )
            .finish()
    }
}

impl EngagementTracker {
    pub fn new(
        users: Arc<dyn UserRepository>,
        movie_views: Arc<dyn MovieViewRepository>,
    ) -> Self {
        Self { users, movie_views }
    }

    /// Validate and persist a new viewer account. A taken email surfaces
    /// as [`CatalogError::Conflict`] straight from the store's unique
    /// constraint; there is no pre-check read.
    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        if user.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "name must not be empty".to_string(),
            ));
        }
        if user.email.trim().is_empty() {
            return Err(CatalogError::Validation(
                "email must not be empty".to_string(),
            ));
        }

        self.users.create_user(&user).await
    }

    /// Record that `user_id` viewed `movie_id`. Idempotent: repeat calls
    /// refresh `viewed_at`, at most one row ever exists per pair. Purely
    /// side-effecting; success carries no payload.
    pub async fn mark_viewed(&self, user_id: i32, movie_id: i32) -> Result<()> {
        if user_id <= 0 {
            return Err(CatalogError::Validation(
                "userId must be a positive integer".to_string(),
            ));
        }
        if movie_id <= 0 {
            return Err(CatalogError::Validation(
                "movieId must be a positive integer".to_string(),
            ));
        }

        let view = self
            .movie_views
            .mark_viewed(user_id, movie_id, Utc::now())
            .await?;

        info!(
            "Recorded view of movie {} by user {} at {}",
            view.movie_id, view.user_id, view.viewed_at
        );
        Ok(())
    }

    /// Every user with the movies they have viewed, in stable order.
    pub async fn users_with_viewed_movies(
        &self,
    ) -> Result<Vec<UserWithViewedMovies>> {
        let rows = self.users.list_users_with_views().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
