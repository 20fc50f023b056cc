// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! In-memory backend for tests and backend-less local runs.
//!
//! Implements the full [`Backend`] contract over plain vectors, with
//! per-collection failure injection so fallback and partial-write paths can
//! be exercised without a network.

use crate::db::{collections, Backend};
use crate::error::{AppError, Result};
use crate::models::{
    Favorite, Follow, Ingredient, MealPlanEntry, Recipe, RecentlyViewed, RecipeUpdate, Review,
    SharedRecipe, ShoppingListItem, Step, User,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory database. Cheap to clone-free share via `Arc`.
#[derive(Default)]
pub struct MemoryDb {
    recipes: Mutex<Vec<Recipe>>,
    users: Mutex<Vec<User>>,
    favorites: Mutex<Vec<Favorite>>,
    recently_viewed: Mutex<Vec<RecentlyViewed>>,
    reviews: Mutex<Vec<Review>>,
    follows: Mutex<Vec<Follow>>,
    shopping_items: Mutex<Vec<ShoppingListItem>>,
    meal_plan_entries: Mutex<Vec<MealPlanEntry>>,
    shared_recipes: Mutex<Vec<SharedRecipe>>,
    /// Collections forced to fail with `BackendUnavailable`.
    failing: Mutex<HashSet<String>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation on `table` fail with `BackendUnavailable`.
    pub fn fail_collection(&self, table: &str) {
        self.failing.lock().unwrap().insert(table.to_string());
    }

    /// Undo [`fail_collection`](Self::fail_collection).
    pub fn restore_collection(&self, table: &str) {
        self.failing.lock().unwrap().remove(table);
    }

    /// Seed a user row (user accounts are provisioned by the auth system,
    /// not through the backend contract).
    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    /// Seed a full recipe with its children inline.
    pub fn add_recipe(&self, recipe: Recipe) {
        self.recipes.lock().unwrap().push(recipe);
    }

    fn check(&self, table: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(table) {
            return Err(AppError::BackendUnavailable(format!(
                "injected failure for {}",
                table
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MemoryDb {
    // ─── Recipes ─────────────────────────────────────────────────

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.check(collections::RECIPES)?;
        let mut recipes = self.recipes.lock().unwrap().clone();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.check(collections::RECIPES)?;
        // Children arrive through their own bulk inserts
        let mut parent = recipe.clone();
        parent.ingredients.clear();
        parent.steps.clear();
        self.recipes.lock().unwrap().push(parent);
        Ok(())
    }

    async fn insert_ingredients(&self, recipe_id: &str, items: &[Ingredient]) -> Result<()> {
        self.check(collections::INGREDIENTS)?;
        let mut recipes = self.recipes.lock().unwrap();
        let recipe = recipes
            .iter_mut()
            .find(|r| r.id == recipe_id)
            .ok_or_else(|| AppError::NotFound(format!("recipe {}", recipe_id)))?;
        recipe.ingredients.extend_from_slice(items);
        Ok(())
    }

    async fn insert_steps(&self, recipe_id: &str, steps: &[Step]) -> Result<()> {
        self.check(collections::STEPS)?;
        let mut recipes = self.recipes.lock().unwrap();
        let recipe = recipes
            .iter_mut()
            .find(|r| r.id == recipe_id)
            .ok_or_else(|| AppError::NotFound(format!("recipe {}", recipe_id)))?;
        recipe.steps.extend_from_slice(steps);
        Ok(())
    }

    async fn delete_ingredients(&self, recipe_id: &str) -> Result<()> {
        self.check(collections::INGREDIENTS)?;
        let mut recipes = self.recipes.lock().unwrap();
        if let Some(recipe) = recipes.iter_mut().find(|r| r.id == recipe_id) {
            recipe.ingredients.clear();
        }
        Ok(())
    }

    async fn delete_steps(&self, recipe_id: &str) -> Result<()> {
        self.check(collections::STEPS)?;
        let mut recipes = self.recipes.lock().unwrap();
        if let Some(recipe) = recipes.iter_mut().find(|r| r.id == recipe_id) {
            recipe.steps.clear();
        }
        Ok(())
    }

    async fn update_recipe(&self, id: &str, update: &RecipeUpdate) -> Result<()> {
        self.check(collections::RECIPES)?;
        let mut recipes = self.recipes.lock().unwrap();
        let recipe = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("recipe {}", id)))?;
        update.apply_scalars(recipe);
        Ok(())
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        self.check(collections::RECIPES)?;
        // Children are stored inline, so the cascade is implicit
        self.recipes.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    // ─── Favorites ───────────────────────────────────────────────

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Favorite>> {
        self.check(collections::FAVORITES)?;
        Ok(self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<()> {
        self.check(collections::FAVORITES)?;
        self.favorites.lock().unwrap().push(favorite.clone());
        Ok(())
    }

    async fn delete_favorite(&self, user_id: &str, recipe_id: &str) -> Result<()> {
        self.check(collections::FAVORITES)?;
        self.favorites
            .lock()
            .unwrap()
            .retain(|f| !(f.user_id == user_id && f.recipe_id == recipe_id));
        Ok(())
    }

    // ─── Recently Viewed ─────────────────────────────────────────

    async fn list_recently_viewed(&self, user_id: &str) -> Result<Vec<RecentlyViewed>> {
        self.check(collections::RECENTLY_VIEWED)?;
        let mut entries: Vec<RecentlyViewed> = self
            .recently_viewed
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        entries.truncate(10);
        Ok(entries)
    }

    async fn upsert_recently_viewed(&self, entry: &RecentlyViewed) -> Result<()> {
        self.check(collections::RECENTLY_VIEWED)?;
        let mut entries = self.recently_viewed.lock().unwrap();
        match entries
            .iter_mut()
            .find(|e| e.user_id == entry.user_id && e.recipe_id == entry.recipe_id)
        {
            Some(existing) => existing.viewed_at = entry.viewed_at,
            None => entries.push(entry.clone()),
        }
        Ok(())
    }

    // ─── Reviews ─────────────────────────────────────────────────

    async fn list_reviews(&self, recipe_id: &str) -> Result<Vec<Review>> {
        self.check(collections::REVIEWS)?;
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.recipe_id == recipe_id)
            .cloned()
            .collect())
    }

    async fn insert_review(&self, review: &Review) -> Result<()> {
        self.check(collections::REVIEWS)?;
        self.reviews.lock().unwrap().push(review.clone());
        Ok(())
    }

    // ─── Users & Follows ─────────────────────────────────────────

    async fn list_users(&self) -> Result<Vec<User>> {
        self.check(collections::USERS)?;
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.followers_count.cmp(&a.followers_count));
        Ok(users)
    }

    async fn list_following(&self, user_id: &str) -> Result<Vec<Follow>> {
        self.check(collections::FOLLOWS)?;
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.follower_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_follow(&self, follow: &Follow) -> Result<()> {
        self.check(collections::FOLLOWS)?;
        self.follows.lock().unwrap().push(follow.clone());
        Ok(())
    }

    async fn delete_follow(&self, follower_id: &str, following_id: &str) -> Result<()> {
        self.check(collections::FOLLOWS)?;
        self.follows
            .lock()
            .unwrap()
            .retain(|f| !(f.follower_id == follower_id && f.following_id == following_id));
        Ok(())
    }

    // ─── Shopping List ───────────────────────────────────────────

    async fn list_shopping_items(&self, user_id: &str) -> Result<Vec<ShoppingListItem>> {
        self.check(collections::SHOPPING_LIST_ITEMS)?;
        let mut items: Vec<ShoppingListItem> = self
            .shopping_items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(items)
    }

    async fn insert_shopping_items(&self, items: &[ShoppingListItem]) -> Result<()> {
        self.check(collections::SHOPPING_LIST_ITEMS)?;
        self.shopping_items
            .lock()
            .unwrap()
            .extend_from_slice(items);
        Ok(())
    }

    async fn set_item_checked(&self, user_id: &str, item_id: &str, checked: bool) -> Result<()> {
        self.check(collections::SHOPPING_LIST_ITEMS)?;
        let mut items = self.shopping_items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id && i.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("shopping item {}", item_id)))?;
        item.is_checked = checked;
        Ok(())
    }

    async fn delete_shopping_item(&self, user_id: &str, item_id: &str) -> Result<()> {
        self.check(collections::SHOPPING_LIST_ITEMS)?;
        self.shopping_items
            .lock()
            .unwrap()
            .retain(|i| !(i.id == item_id && i.user_id == user_id));
        Ok(())
    }

    async fn delete_checked_items(&self, user_id: &str) -> Result<()> {
        self.check(collections::SHOPPING_LIST_ITEMS)?;
        self.shopping_items
            .lock()
            .unwrap()
            .retain(|i| !(i.user_id == user_id && i.is_checked));
        Ok(())
    }

    async fn delete_all_items(&self, user_id: &str) -> Result<()> {
        self.check(collections::SHOPPING_LIST_ITEMS)?;
        self.shopping_items
            .lock()
            .unwrap()
            .retain(|i| i.user_id != user_id);
        Ok(())
    }

    // ─── Meal Plan ───────────────────────────────────────────────

    async fn list_meal_plan_entries(&self, user_id: &str) -> Result<Vec<MealPlanEntry>> {
        self.check(collections::MEAL_PLAN_ENTRIES)?;
        let mut entries: Vec<MealPlanEntry> = self
            .meal_plan_entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }

    async fn insert_meal_plan_entry(&self, entry: &MealPlanEntry) -> Result<()> {
        self.check(collections::MEAL_PLAN_ENTRIES)?;
        self.meal_plan_entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn delete_meal_plan_entry(&self, user_id: &str, entry_id: &str) -> Result<()> {
        self.check(collections::MEAL_PLAN_ENTRIES)?;
        self.meal_plan_entries
            .lock()
            .unwrap()
            .retain(|e| !(e.id == entry_id && e.user_id == user_id));
        Ok(())
    }

    // ─── Shared Recipes ──────────────────────────────────────────

    async fn list_shared_recipes(&self, user_id: &str) -> Result<Vec<SharedRecipe>> {
        self.check(collections::SHARED_RECIPES)?;
        let mut shares: Vec<SharedRecipe> = self
            .shared_recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.to_user_id == user_id)
            .cloned()
            .collect();
        shares.sort_by(|a, b| b.shared_at.cmp(&a.shared_at));
        Ok(shares)
    }

    async fn insert_shared_recipes(&self, shares: &[SharedRecipe]) -> Result<()> {
        self.check(collections::SHARED_RECIPES)?;
        self.shared_recipes
            .lock()
            .unwrap()
            .extend_from_slice(shares);
        Ok(())
    }
}
