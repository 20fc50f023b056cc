// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Data models for the engine.

pub mod meal_plan;
pub mod recipe;
pub mod review;
pub mod shopping;
pub mod user;

pub use meal_plan::{MealPlanEntry, MealType};
pub use recipe::{
    Category, Difficulty, Favorite, Ingredient, NewIngredient, NewRecipe, NewStep, NutritionInfo,
    Recipe, RecentlyViewed, RecipeUpdate, Step,
};
pub use review::{NewReview, Review};
pub use shopping::{NewShoppingItem, ShoppingListItem};
pub use user::{Follow, SharedRecipe, User};
