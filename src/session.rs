//! Signed-in user state.
//!
//! The session holds the authenticated user's profile; auth transport (token
//! exchange, deep links) lives in the UI shell, which calls `sign_in` once a
//! profile is established.

use crate::error::{AppError, Result};
use crate::models::User;
use std::sync::{Arc, RwLock};

/// Shared handle to the current authenticated user, if any.
#[derive(Clone, Default)]
pub struct Session {
    current: Arc<RwLock<Option<User>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with a known user (testing and backend-less runs).
    pub fn signed_in(user: User) -> Self {
        let session = Self::new();
        session.sign_in(user);
        session
    }

    pub fn sign_in(&self, user: User) {
        tracing::info!(user_id = %user.id, username = %user.username, "Signed in");
        *self.current.write().unwrap() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.current.write().unwrap() = None;
    }

    /// The current user's profile, if signed in.
    pub fn current_user(&self) -> Option<User> {
        self.current.read().unwrap().clone()
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.current.read().unwrap().as_ref().map(|u| u.id.clone())
    }

    /// The current user's id, or `NotAuthenticated`.
    ///
    /// Every mutation that needs a known actor goes through this.
    pub fn require_user_id(&self) -> Result<String> {
        self.current_user_id().ok_or(AppError::NotAuthenticated)
    }
}
