// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Dual-mode follow graph storage.
//!
//! The follow relation is the one entity that degrades gracefully: when the
//! backend is unconfigured, the actor is anonymous, or the capability probe's
//! remote read fails, every follow read and write goes through an on-device
//! persisted id list instead of the remote table. The mode is selected once
//! per session; there is no promotion back to remote within a session.

use crate::config::Config;
use crate::db::Backend;
use crate::error::{AppError, Result};
use crate::models::Follow;
use crate::session::Session;
use crate::store::Collections;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// File under the data dir holding the local follow id list.
const LOCAL_FOLLOW_FILE: &str = "followed_users.json";

/// Which source of truth the follow graph is using this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowMode {
    Remote,
    Local,
}

/// Source of truth for "who do I follow".
#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Ids of the users the current actor follows.
    async fn following_ids(&self) -> Result<Vec<String>>;

    /// Follow `user_id` if not followed, unfollow otherwise.
    /// Returns whether the user is followed afterwards.
    async fn toggle(&self, user_id: &str) -> Result<bool>;

    fn mode(&self) -> FollowMode;
}

/// Select the follow-graph source for this session.
///
/// Backend unconfigured or anonymous actor means local; otherwise one probing
/// remote read decides, and a failed probe falls back to local. The decision
/// is made here, once, rather than re-checked at every call site.
pub async fn select_follow_store(
    config: &Config,
    session: &Session,
    db: Arc<dyn Backend>,
    store: Arc<Collections>,
) -> Result<Arc<dyn FollowStore>> {
    let local = || -> Result<Arc<dyn FollowStore>> {
        Ok(Arc::new(LocalFollowStore::load(&config.data_dir)?))
    };

    if !config.backend_configured() {
        tracing::info!("Follow graph using local mirror (no backend configured)");
        return local();
    }
    let Some(user_id) = session.current_user_id() else {
        tracing::info!("Follow graph using local mirror (no authenticated user)");
        return local();
    };

    match db.list_following(&user_id).await {
        Ok(_) => {
            tracing::info!("Follow graph using remote backend");
            Ok(Arc::new(RemoteFollowStore {
                db,
                session: session.clone(),
                store,
            }))
        }
        Err(err) => {
            tracing::warn!(error = %err, "Follow graph probe failed, using local mirror");
            local()
        }
    }
}

/// Remote follow storage: the follows table plus the scoped query cache.
pub struct RemoteFollowStore {
    db: Arc<dyn Backend>,
    session: Session,
    store: Arc<Collections>,
}

#[async_trait]
impl FollowStore for RemoteFollowStore {
    async fn following_ids(&self) -> Result<Vec<String>> {
        let user_id = self.session.require_user_id()?;
        let follows = self
            .store
            .follows
            .get_or_fetch(&user_id, self.db.list_following(&user_id))
            .await?;
        Ok(follows.iter().map(|f| f.following_id.clone()).collect())
    }

    async fn toggle(&self, user_id: &str) -> Result<bool> {
        let follower_id = self.session.require_user_id()?;
        let following = self.following_ids().await?;

        let now_following = if following.iter().any(|id| id == user_id) {
            self.db.delete_follow(&follower_id, user_id).await?;
            false
        } else {
            self.db
                .insert_follow(&Follow {
                    follower_id: follower_id.clone(),
                    following_id: user_id.to_string(),
                })
                .await?;
            true
        };

        self.store.follows.invalidate(&follower_id);
        tracing::info!(user_id, now_following, "Toggled follow (remote)");
        Ok(now_following)
    }

    fn mode(&self) -> FollowMode {
        FollowMode::Remote
    }
}

/// On-device persisted follow list.
///
/// Reads serve the in-memory list; the JSON file is a write-behind mirror
/// that makes the list survive restarts. A toggle is committed only after
/// both the file write and the memory update complete.
pub struct LocalFollowStore {
    ids: RwLock<Vec<String>>,
    path: PathBuf,
}

impl LocalFollowStore {
    /// Load the persisted list from the data dir, once, at selection time.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(LOCAL_FOLLOW_FILE);
        let ids = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<String>>(&contents) {
                Ok(ids) => ids,
                Err(err) => {
                    // A corrupt mirror is replaced on the next write
                    tracing::warn!(path = %path.display(), error = %err, "Local follow list unreadable, starting empty");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(AppError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        tracing::info!(count = ids.len(), "Loaded local follow list");
        Ok(Self {
            ids: RwLock::new(ids),
            path,
        })
    }

    fn persist(&self, ids: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("failed to create data dir: {}", e)))?;
        }
        let json = serde_json::to_string(ids)
            .map_err(|e| AppError::Storage(format!("failed to encode follow list: {}", e)))?;
        fs::write(&self.path, json).map_err(|e| {
            AppError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl FollowStore for LocalFollowStore {
    async fn following_ids(&self) -> Result<Vec<String>> {
        Ok(self.ids.read().unwrap().clone())
    }

    async fn toggle(&self, user_id: &str) -> Result<bool> {
        let mut ids = self.ids.write().unwrap();

        let mut updated = ids.clone();
        let now_following = match updated.iter().position(|id| id == user_id) {
            Some(position) => {
                updated.remove(position);
                false
            }
            None => {
                updated.push(user_id.to_string());
                true
            }
        };

        // Durable mirror first; the memory update commits the toggle
        self.persist(&updated)?;
        *ids = updated;

        tracing::info!(user_id, now_following, "Toggled follow (local)");
        Ok(now_following)
    }

    fn mode(&self) -> FollowMode {
        FollowMode::Local
    }
}
