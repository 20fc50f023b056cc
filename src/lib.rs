// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Forkful data engine: client-resident sync and derived views.
//!
//! This crate is the data layer of the Forkful recipe app. It mirrors the
//! server-owned collections into client memory with invalidation-driven
//! caching, keeps the follow graph usable without a backend through an
//! on-device mirror, and computes the derived views the UI renders.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod store;
pub mod views;

use config::Config;
use db::{Backend, RestDb};
use error::Result;
use services::{
    select_follow_store, MealPlanService, RecipeService, ShoppingListService, SocialService,
};
use session::Session;
use std::sync::Arc;
use store::Collections;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared application state: the wired-up services the UI reads and mutates
/// through.
pub struct AppState {
    pub config: Config,
    pub session: Session,
    pub recipes: RecipeService,
    pub shopping: ShoppingListService,
    pub meal_plan: MealPlanService,
    pub social: SocialService,
}

impl AppState {
    /// Wire up the engine against the configured REST backend.
    ///
    /// The follow-graph source (remote table vs. local mirror) is decided
    /// here, once, by the capability probe.
    pub async fn init(config: Config, session: Session) -> Result<Self> {
        let db: Arc<dyn Backend> = Arc::new(RestDb::new(&config));
        Self::with_backend(config, session, db).await
    }

    /// Wire up the engine against an explicit backend implementation.
    pub async fn with_backend(
        config: Config,
        session: Session,
        db: Arc<dyn Backend>,
    ) -> Result<Self> {
        let store = Arc::new(Collections::default());
        let follows = select_follow_store(&config, &session, db.clone(), store.clone()).await?;

        Ok(Self {
            recipes: RecipeService::new(db.clone(), session.clone(), store.clone()),
            shopping: ShoppingListService::new(db.clone(), session.clone(), store.clone()),
            meal_plan: MealPlanService::new(db.clone(), session.clone(), store.clone()),
            social: SocialService::new(db, session.clone(), store, follows),
            config,
            session,
        })
    }
}

/// Initialize structured JSON logging.
pub fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("forkful_data=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
