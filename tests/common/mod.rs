// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

use chrono::Utc;
use forkful_data::config::Config;
use forkful_data::db::{Backend, MemoryDb};
use forkful_data::models::{NewIngredient, NewRecipe, NewStep, User};
use forkful_data::session::Session;
use forkful_data::AppState;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Id of the user most tests sign in as.
#[allow(dead_code)]
pub const CURRENT_USER: &str = "user-1";

/// An engine wired against an in-memory backend, plus handles for seeding,
/// failure injection, and restart simulation.
pub struct TestApp {
    pub state: AppState,
    pub db: Arc<MemoryDb>,
    /// Keeps the engine's data dir alive for the test's duration.
    #[allow(dead_code)]
    pub data_dir: TempDir,
}

/// Test configuration pointing at the given data dir.
#[allow(dead_code)]
pub fn test_config(data_dir: &Path, backend_configured: bool) -> Config {
    Config {
        api_url: backend_configured.then(|| "http://backend.test".to_string()),
        api_key: "test_api_key".to_string(),
        data_dir: data_dir.to_path_buf(),
    }
}

/// Build an engine over an explicit backend/session/config.
#[allow(dead_code)]
pub async fn build_app(config: Config, session: Session, db: Arc<MemoryDb>) -> AppState {
    AppState::with_backend(config, session, db as Arc<dyn Backend>)
        .await
        .expect("engine should wire up")
}

/// Engine with a configured backend, signed in as `CURRENT_USER`.
#[allow(dead_code)]
pub async fn signed_in_app() -> TestApp {
    let data_dir = tempfile::tempdir().expect("tempdir");
    let db = Arc::new(MemoryDb::new());
    db.add_user(make_user(CURRENT_USER, 0));
    let session = Session::signed_in(make_user(CURRENT_USER, 0));

    let state = build_app(test_config(data_dir.path(), true), session, db.clone()).await;
    TestApp {
        state,
        db,
        data_dir,
    }
}

/// Engine with a configured backend and nobody signed in.
#[allow(dead_code)]
pub async fn signed_out_app() -> TestApp {
    let data_dir = tempfile::tempdir().expect("tempdir");
    let db = Arc::new(MemoryDb::new());

    let state = build_app(test_config(data_dir.path(), true), Session::new(), db.clone()).await;
    TestApp {
        state,
        db,
        data_dir,
    }
}

/// A user profile row.
#[allow(dead_code)]
pub fn make_user(id: &str, followers_count: u32) -> User {
    User {
        id: id.to_string(),
        username: format!("@{}", id),
        display_name: format!("User {}", id),
        avatar_url: None,
        bio: String::new(),
        recipes_count: 0,
        followers_count,
        following_count: 0,
        is_verified: false,
        joined_at: Utc::now(),
    }
}

/// Recipe input with one step and the given ingredient names.
#[allow(dead_code)]
pub fn new_recipe(title: &str, ingredient_names: &[&str]) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        description: format!("{} description", title),
        image_url: None,
        category: forkful_data::models::Category::Dinner,
        cuisine: "Test Kitchen".to_string(),
        difficulty: forkful_data::models::Difficulty::Easy,
        prep_time_minutes: 10,
        cook_time_minutes: 20,
        servings: 2,
        ingredients: ingredient_names
            .iter()
            .map(|name| NewIngredient {
                name: name.to_string(),
                amount: "1".to_string(),
                unit: "cup".to_string(),
            })
            .collect(),
        steps: vec![NewStep {
            order: 1,
            instruction: "Combine and cook".to_string(),
            duration_minutes: Some(20),
            tip: None,
        }],
        nutrition: None,
        tags: vec![],
        source_url: None,
    }
}
