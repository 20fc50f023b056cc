//! User profile, follow edge, and recipe-share models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile as stored in the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Unique handle
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: String,
    pub recipes_count: u32,
    pub followers_count: u32,
    pub following_count: u32,
    pub is_verified: bool,
    pub joined_at: DateTime<Utc>,
}

/// Directed follow edge: `follower_id` follows `following_id`.
///
/// The only relation with two storage modes: the remote table, or the
/// on-device persisted id list when the backend is unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: String,
    pub following_id: String,
}

/// One recipe shared from one user to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedRecipe {
    pub id: String,
    pub recipe_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub message: Option<String>,
    pub shared_at: DateTime<Utc>,
}
