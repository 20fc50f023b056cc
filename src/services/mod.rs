// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Services module - query, mutation, and fallback logic per domain.

pub mod follow;
pub mod meal_plan;
pub mod recipes;
pub mod shopping;
pub mod social;

pub use follow::{
    select_follow_store, FollowMode, FollowStore, LocalFollowStore, RemoteFollowStore,
};
pub use meal_plan::MealPlanService;
pub use recipes::RecipeService;
pub use shopping::ShoppingListService;
pub use social::SocialService;
