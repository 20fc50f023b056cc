// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Social graph service: follows, user suggestions, profile lookup, and
//! recipe sharing.

use crate::db::Backend;
use crate::error::{AppError, Result};
use crate::models::{SharedRecipe, User};
use crate::services::follow::{FollowMode, FollowStore};
use crate::session::Session;
use crate::store::Collections;
use crate::views;
use std::sync::Arc;
use uuid::Uuid;

/// Follow graph and sharing.
#[derive(Clone)]
pub struct SocialService {
    db: Arc<dyn Backend>,
    session: Session,
    store: Arc<Collections>,
    follows: Arc<dyn FollowStore>,
}

impl SocialService {
    pub fn new(
        db: Arc<dyn Backend>,
        session: Session,
        store: Arc<Collections>,
        follows: Arc<dyn FollowStore>,
    ) -> Self {
        Self {
            db,
            session,
            store,
            follows,
        }
    }

    /// Which follow-graph source this session selected.
    pub fn follow_mode(&self) -> FollowMode {
        self.follows.mode()
    }

    /// Ids of the users the current actor follows.
    pub async fn following_ids(&self) -> Result<Vec<String>> {
        self.follows.following_ids().await
    }

    /// Follow or unfollow a user; returns whether they are followed
    /// afterwards. Following yourself is rejected.
    pub async fn toggle_follow(&self, user_id: &str) -> Result<bool> {
        if self.session.current_user_id().as_deref() == Some(user_id) {
            return Err(AppError::Validation(
                "cannot follow yourself".to_string(),
            ));
        }
        self.follows.toggle(user_id).await
    }

    /// Non-followed users ranked by follower count, capped at five.
    pub async fn suggested_users(&self) -> Result<Vec<User>> {
        let (users, following) = tokio::try_join!(
            self.store.users.get_or_fetch(&(), self.db.list_users()),
            self.follows.following_ids(),
        )?;
        let current_id = self.session.current_user_id();
        Ok(views::suggested_users(
            &users,
            &following,
            current_id.as_deref(),
        ))
    }

    /// Look up a user profile. The signed-in user's own profile is served
    /// from the session without touching the users collection.
    pub async fn user_profile(&self, user_id: &str) -> Result<Option<User>> {
        if let Some(current) = self.session.current_user() {
            if current.id == user_id {
                return Ok(Some(current));
            }
        }
        let users = self
            .store
            .users
            .get_or_fetch(&(), self.db.list_users())
            .await?;
        Ok(users.iter().find(|u| u.id == user_id).cloned())
    }

    /// Share a recipe with one or more users, one row per target in a
    /// single batch.
    pub async fn share_recipe(
        &self,
        recipe_id: &str,
        to_user_ids: &[String],
        message: Option<String>,
    ) -> Result<()> {
        let from_user_id = self.session.require_user_id()?;
        if to_user_ids.is_empty() {
            return Ok(());
        }

        let shared_at = chrono::Utc::now();
        let shares: Vec<SharedRecipe> = to_user_ids
            .iter()
            .map(|to_user_id| SharedRecipe {
                id: Uuid::new_v4().to_string(),
                recipe_id: recipe_id.to_string(),
                from_user_id: from_user_id.clone(),
                to_user_id: to_user_id.clone(),
                message: message.clone(),
                shared_at,
            })
            .collect();

        self.db.insert_shared_recipes(&shares).await?;
        self.store.shared.invalidate(&from_user_id);
        tracing::info!(recipe_id, targets = shares.len(), "Recipe shared");
        Ok(())
    }

    /// Recipes other users shared with the current user, newest first.
    pub async fn shared_with_me(&self) -> Result<Vec<SharedRecipe>> {
        let Some(user_id) = self.session.current_user_id() else {
            return Ok(Vec::new());
        };
        let shares = self
            .store
            .shared
            .get_or_fetch(&user_id, self.db.list_shared_recipes(&user_id))
            .await?;
        Ok(shares.as_ref().clone())
    }
}
