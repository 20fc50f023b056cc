// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

mod common;

use common::{build_app, make_user, signed_in_app, test_config, CURRENT_USER};
use forkful_data::db::{collections, Backend, MemoryDb};
use forkful_data::error::AppError;
use forkful_data::services::FollowMode;
use forkful_data::session::Session;
use std::sync::Arc;

#[tokio::test]
async fn test_unconfigured_backend_selects_local_mode() {
    let data_dir = tempfile::tempdir().unwrap();
    let db = Arc::new(MemoryDb::new());
    let session = Session::signed_in(make_user(CURRENT_USER, 0));

    let state = build_app(test_config(data_dir.path(), false), session, db.clone()).await;
    assert_eq!(state.social.follow_mode(), FollowMode::Local);

    // Local toggles never touch the backend's follows table
    assert!(state.social.toggle_follow("user-7").await.unwrap());
    assert!(db.list_following(CURRENT_USER).await.unwrap().is_empty());
    assert_eq!(
        state.social.following_ids().await.unwrap(),
        vec!["user-7".to_string()]
    );
}

#[tokio::test]
async fn test_anonymous_session_selects_local_mode() {
    let data_dir = tempfile::tempdir().unwrap();
    let db = Arc::new(MemoryDb::new());

    let state = build_app(test_config(data_dir.path(), true), Session::new(), db).await;
    assert_eq!(state.social.follow_mode(), FollowMode::Local);

    // The local path needs no authenticated actor
    assert!(state.social.toggle_follow("user-7").await.unwrap());
}

#[tokio::test]
async fn test_probe_failure_falls_back_to_local_mode() {
    let data_dir = tempfile::tempdir().unwrap();
    let db = Arc::new(MemoryDb::new());
    db.fail_collection(collections::FOLLOWS);
    let session = Session::signed_in(make_user(CURRENT_USER, 0));

    let state = build_app(test_config(data_dir.path(), true), session, db.clone()).await;
    assert_eq!(state.social.follow_mode(), FollowMode::Local);

    // Follows keep working even though the remote table is down
    assert!(state.social.toggle_follow("user-3").await.unwrap());
    assert_eq!(
        state.social.following_ids().await.unwrap(),
        vec!["user-3".to_string()]
    );
}

#[tokio::test]
async fn test_local_follow_state_survives_restart() {
    let data_dir = tempfile::tempdir().unwrap();
    let db = Arc::new(MemoryDb::new());

    {
        let session = Session::signed_in(make_user(CURRENT_USER, 0));
        let state = build_app(test_config(data_dir.path(), false), session, db.clone()).await;
        state.social.toggle_follow("user-2").await.unwrap();
        state.social.toggle_follow("user-5").await.unwrap();
        state.social.toggle_follow("user-2").await.unwrap(); // unfollow again
    }

    // Simulated restart: a fresh engine over the same data dir
    let session = Session::signed_in(make_user(CURRENT_USER, 0));
    let state = build_app(test_config(data_dir.path(), false), session, db).await;
    assert_eq!(
        state.social.following_ids().await.unwrap(),
        vec!["user-5".to_string()]
    );
}

#[tokio::test]
async fn test_remote_mode_round_trips_through_backend() {
    let app = signed_in_app().await;
    assert_eq!(app.state.social.follow_mode(), FollowMode::Remote);

    assert!(app.state.social.toggle_follow("user-2").await.unwrap());
    let edges = app.db.list_following(CURRENT_USER).await.unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].following_id, "user-2");

    assert!(!app.state.social.toggle_follow("user-2").await.unwrap());
    assert!(app.db.list_following(CURRENT_USER).await.unwrap().is_empty());
    assert!(app.state.social.following_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_self_follow_rejected() {
    let app = signed_in_app().await;
    let err = app.state.social.toggle_follow(CURRENT_USER).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
