use async_trait::async_trait;

use marquee_model::{NewUser, User, UserWithViews};

use crate::error::Result;

/// Typed access to the user table and the view join behind the
/// users-with-viewed-movies listing.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the stored row. A taken email surfaces the
    /// store's unique-constraint violation as a conflict; there is no
    /// pre-check read.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Every user together with the movies they have viewed. Users ordered
    /// by id ascending, each view list by `viewed_at` descending.
    async fn list_users_with_views(&self) -> Result<Vec<UserWithViews>>;
}
