// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Recipe catalog service: reads through the entity store, named mutations
//! against the backend.
//!
//! Every mutation follows the same discipline: precondition checks, backend
//! write, then invalidation of the collections the write affects. The next
//! read of an invalidated collection refetches.

use crate::db::Backend;
use crate::error::{AppError, Result};
use crate::models::{
    Favorite, Ingredient, NewRecipe, NewReview, Recipe, RecentlyViewed, RecipeUpdate, Review, Step,
};
use crate::session::Session;
use crate::store::Collections;
use crate::views::{self, RecipeView};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Recipes, favorites, viewing history, and reviews.
#[derive(Clone)]
pub struct RecipeService {
    db: Arc<dyn Backend>,
    session: Session,
    store: Arc<Collections>,
}

impl RecipeService {
    pub fn new(db: Arc<dyn Backend>, session: Session, store: Arc<Collections>) -> Self {
        Self { db, session, store }
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// All recipes with the current user's favorite flags.
    ///
    /// Signed-out readers get every flag false.
    pub async fn all_recipes(&self) -> Result<Vec<RecipeView>> {
        let recipes = match self.session.current_user_id() {
            Some(user_id) => {
                let (recipes, favorites) = tokio::try_join!(
                    self.store.recipes.get_or_fetch(&(), self.db.list_recipes()),
                    self.store
                        .favorites
                        .get_or_fetch(&user_id, self.db.list_favorites(&user_id)),
                )?;
                let favorite_ids: Vec<String> =
                    favorites.iter().map(|f| f.recipe_id.clone()).collect();
                views::annotate_favorites(&recipes, &favorite_ids)
            }
            None => {
                let recipes = self
                    .store
                    .recipes
                    .get_or_fetch(&(), self.db.list_recipes())
                    .await?;
                views::annotate_favorites(&recipes, &[])
            }
        };
        Ok(recipes)
    }

    /// Only the current user's favorited recipes.
    pub async fn favorite_recipes(&self) -> Result<Vec<RecipeView>> {
        Ok(views::favorites_only(&self.all_recipes().await?))
    }

    /// The ten most recently viewed recipes, newest first.
    pub async fn recent_recipes(&self) -> Result<Vec<Recipe>> {
        let Some(user_id) = self.session.current_user_id() else {
            return Ok(Vec::new());
        };
        let (entries, recipes) = tokio::try_join!(
            self.store
                .recents
                .get_or_fetch(&user_id, self.db.list_recently_viewed(&user_id)),
            self.store.recipes.get_or_fetch(&(), self.db.list_recipes()),
        )?;
        Ok(views::recent_recipes(&entries, &recipes))
    }

    /// Recipes authored by the current user.
    pub async fn custom_recipes(&self) -> Result<Vec<Recipe>> {
        let Some(user_id) = self.session.current_user_id() else {
            return Ok(Vec::new());
        };
        let recipes = self
            .store
            .recipes
            .get_or_fetch(&(), self.db.list_recipes())
            .await?;
        Ok(views::custom_recipes(&recipes, &user_id))
    }

    /// Reviews for one recipe, newest first.
    pub async fn reviews(&self, recipe_id: &str) -> Result<Vec<Review>> {
        let reviews = self
            .store
            .reviews
            .get_or_fetch(
                &recipe_id.to_string(),
                self.db.list_reviews(recipe_id),
            )
            .await?;
        Ok(reviews.as_ref().clone())
    }

    /// Mean review rating, or `None` when the recipe has no reviews yet;
    /// the caller falls back to the recipe's seeded rating.
    pub async fn average_rating(&self, recipe_id: &str) -> Result<Option<f64>> {
        let reviews = self
            .store
            .reviews
            .get_or_fetch(
                &recipe_id.to_string(),
                self.db.list_reviews(recipe_id),
            )
            .await?;
        Ok(views::average_rating(&reviews))
    }

    // ─── Mutations ───────────────────────────────────────────────

    /// Add or remove the recipe from the current user's favorites.
    /// Returns whether the recipe is a favorite afterwards.
    pub async fn toggle_favorite(&self, recipe_id: &str) -> Result<bool> {
        let user_id = self.session.require_user_id()?;
        let favorites = self
            .store
            .favorites
            .get_or_fetch(&user_id, self.db.list_favorites(&user_id))
            .await?;

        let is_favorite = if favorites.iter().any(|f| f.recipe_id == recipe_id) {
            self.db.delete_favorite(&user_id, recipe_id).await?;
            false
        } else {
            self.db
                .insert_favorite(&Favorite {
                    user_id: user_id.clone(),
                    recipe_id: recipe_id.to_string(),
                })
                .await?;
            true
        };

        self.store.favorites.invalidate(&user_id);
        tracing::info!(recipe_id, is_favorite, "Toggled favorite");
        Ok(is_favorite)
    }

    /// Record that the current user viewed a recipe.
    ///
    /// Viewing the same recipe again bumps its timestamp rather than adding
    /// a second entry.
    pub async fn mark_viewed(&self, recipe_id: &str) -> Result<()> {
        let user_id = self.session.require_user_id()?;
        self.db
            .upsert_recently_viewed(&RecentlyViewed {
                user_id: user_id.clone(),
                recipe_id: recipe_id.to_string(),
                viewed_at: chrono::Utc::now(),
            })
            .await?;
        self.store.recents.invalidate(&user_id);
        Ok(())
    }

    /// Create a recipe authored by the current user.
    ///
    /// The parent row and the two child sequences are separate inserts with
    /// no backend transaction; if a child insert fails the parent is removed
    /// again so no orphaned recipe is left behind.
    pub async fn add_recipe(&self, input: NewRecipe) -> Result<Recipe> {
        let user_id = self.session.require_user_id()?;
        input.validate()?;

        let recipe = Recipe {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            image_url: input.image_url,
            category: input.category,
            cuisine: input.cuisine,
            difficulty: input.difficulty,
            prep_time_minutes: input.prep_time_minutes,
            cook_time_minutes: input.cook_time_minutes,
            servings: input.servings,
            ingredients: input
                .ingredients
                .into_iter()
                .map(|i| Ingredient {
                    id: Uuid::new_v4().to_string(),
                    name: i.name,
                    amount: i.amount,
                    unit: i.unit,
                })
                .collect(),
            steps: input
                .steps
                .into_iter()
                .map(|s| Step {
                    id: Uuid::new_v4().to_string(),
                    order: s.order,
                    instruction: s.instruction,
                    duration_minutes: s.duration_minutes,
                    tip: s.tip,
                })
                .collect(),
            nutrition: input.nutrition,
            tags: input.tags,
            rating: 0.0,
            review_count: 0,
            created_at: chrono::Utc::now(),
            source_url: input.source_url,
            author_id: Some(user_id),
        };

        self.db.insert_recipe(&recipe).await?;
        if let Err(err) = self.insert_children(&recipe).await {
            return Err(self.compensate_parent_insert(&recipe.id, err).await);
        }

        self.store.recipes.invalidate(&());
        tracing::info!(recipe_id = %recipe.id, title = %recipe.title, "Recipe added");
        Ok(recipe)
    }

    async fn insert_children(&self, recipe: &Recipe) -> Result<()> {
        if !recipe.ingredients.is_empty() {
            self.db
                .insert_ingredients(&recipe.id, &recipe.ingredients)
                .await?;
        }
        if !recipe.steps.is_empty() {
            self.db.insert_steps(&recipe.id, &recipe.steps).await?;
        }
        Ok(())
    }

    /// A child insert failed after the parent row landed. Delete the parent
    /// again; if even that fails, report the write as partial.
    async fn compensate_parent_insert(&self, recipe_id: &str, cause: AppError) -> AppError {
        match self.db.delete_recipe(recipe_id).await {
            Ok(()) => {
                tracing::warn!(recipe_id, error = %cause, "Recipe children insert failed, parent removed");
                cause
            }
            Err(delete_err) => {
                tracing::error!(
                    recipe_id,
                    error = %cause,
                    delete_error = %delete_err,
                    "Recipe children insert failed and parent could not be removed"
                );
                AppError::PartialWrite {
                    entity: "recipe".to_string(),
                    cause: cause.to_string(),
                }
            }
        }
    }

    /// Update a recipe the current user authored.
    ///
    /// Scalars present in `update` are patched. A present `ingredients` or
    /// `steps` sequence replaces the stored sequence in full; an absent one
    /// leaves it untouched.
    pub async fn update_recipe(&self, recipe_id: &str, update: RecipeUpdate) -> Result<()> {
        let user_id = self.session.require_user_id()?;
        self.require_author(recipe_id, &user_id).await?;

        if update.has_scalar_changes() {
            self.db.update_recipe(recipe_id, &update).await?;
        }

        if let Some(new_ingredients) = &update.ingredients {
            let replacement: Vec<Ingredient> = new_ingredients
                .iter()
                .map(|i| Ingredient {
                    id: Uuid::new_v4().to_string(),
                    name: i.name.clone(),
                    amount: i.amount.clone(),
                    unit: i.unit.clone(),
                })
                .collect();
            self.db.delete_ingredients(recipe_id).await?;
            if !replacement.is_empty() {
                self.db.insert_ingredients(recipe_id, &replacement).await?;
            }
        }

        if let Some(new_steps) = &update.steps {
            let replacement: Vec<Step> = new_steps
                .iter()
                .map(|s| Step {
                    id: Uuid::new_v4().to_string(),
                    order: s.order,
                    instruction: s.instruction.clone(),
                    duration_minutes: s.duration_minutes,
                    tip: s.tip.clone(),
                })
                .collect();
            self.db.delete_steps(recipe_id).await?;
            if !replacement.is_empty() {
                self.db.insert_steps(recipe_id, &replacement).await?;
            }
        }

        self.store.recipes.invalidate(&());
        tracing::info!(recipe_id, "Recipe updated");
        Ok(())
    }

    /// Delete a recipe the current user authored.
    ///
    /// The recipe must disappear from every derived view that references it,
    /// so favorites and viewing history are invalidated along with the
    /// recipes collection.
    pub async fn delete_recipe(&self, recipe_id: &str) -> Result<()> {
        let user_id = self.session.require_user_id()?;
        self.require_author(recipe_id, &user_id).await?;

        self.db.delete_recipe(recipe_id).await?;

        self.store.recipes.invalidate(&());
        self.store.favorites.invalidate(&user_id);
        self.store.recents.invalidate(&user_id);
        tracing::info!(recipe_id, "Recipe deleted");
        Ok(())
    }

    /// Post a review. Append-only; ratings outside 1..=5 are rejected.
    pub async fn add_review(&self, recipe_id: &str, input: NewReview) -> Result<Review> {
        let user = self
            .session
            .current_user()
            .ok_or(AppError::NotAuthenticated)?;
        input.validate()?;

        let review = Review {
            id: Uuid::new_v4().to_string(),
            recipe_id: recipe_id.to_string(),
            rating: input.rating,
            comment: input.comment,
            author_name: user.display_name,
            created_at: chrono::Utc::now(),
        };
        self.db.insert_review(&review).await?;

        // Recipe-level rating rollups depend on the review set
        self.store.reviews.invalidate(&recipe_id.to_string());
        self.store.recipes.invalidate(&());
        tracing::info!(recipe_id, rating = review.rating, "Review added");
        Ok(review)
    }

    /// Authorization check by scope: only the author may modify a recipe.
    async fn require_author(&self, recipe_id: &str, user_id: &str) -> Result<()> {
        let recipes = self
            .store
            .recipes
            .get_or_fetch(&(), self.db.list_recipes())
            .await?;
        let recipe = recipes
            .iter()
            .find(|r| r.id == recipe_id)
            .ok_or_else(|| AppError::NotFound(format!("recipe {}", recipe_id)))?;

        if recipe.author_id.as_deref() != Some(user_id) {
            return Err(AppError::NotAuthorized(format!(
                "recipe {} belongs to another user",
                recipe_id
            )));
        }
        Ok(())
    }
}
