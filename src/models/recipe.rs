// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Recipe aggregate: the recipe row plus its owned ingredient/step sequences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Recipe category shown as browse tabs in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Drink,
}

/// Recipe difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Per-serving nutrition facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: u32,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
}

/// One ingredient line of a recipe.
///
/// Ingredients have no lifecycle outside their recipe; their order within the
/// recipe is the display and shopping order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Free-text quantity ("2", "1/2", "a pinch")
    pub amount: String,
    pub unit: String,
}

/// One preparation step of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    /// 1-based position, dense after every edit
    pub order: u32,
    pub instruction: String,
    /// Optional timer length in minutes
    pub duration_minutes: Option<u32>,
    pub tip: Option<String>,
}

/// Full recipe record as fetched from the backend (children inlined, ordered).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category: Category,
    pub cuisine: String,
    pub difficulty: Difficulty,
    /// Preparation time in minutes
    pub prep_time_minutes: u32,
    /// Cooking time in minutes
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub nutrition: Option<NutritionInfo>,
    pub tags: Vec<String>,
    /// Seeded star rating, used when a recipe has no reviews yet
    pub rating: f64,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    /// Where the recipe was imported from, if anywhere
    pub source_url: Option<String>,
    /// Author user id; seeded catalog recipes have none
    pub author_id: Option<String>,
}

/// Favorite set membership: (user, recipe), toggled, never duplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: String,
    pub recipe_id: String,
}

/// Recently-viewed row with upsert-on-conflict semantics keyed by
/// (user, recipe): viewing a recipe again bumps `viewed_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyViewed {
    pub user_id: String,
    pub recipe_id: String,
    pub viewed_at: DateTime<Utc>,
}

// ─── Mutation Inputs ─────────────────────────────────────────

/// Ingredient line supplied by the caller; ids and positions are assigned
/// by the mutation layer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewIngredient {
    #[validate(length(min = 1, message = "ingredient name must not be empty"))]
    pub name: String,
    pub amount: String,
    pub unit: String,
}

/// Step supplied by the caller with its 1-based order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewStep {
    #[validate(range(min = 1, message = "step order is 1-based"))]
    pub order: u32,
    #[validate(length(min = 1, message = "step instruction must not be empty"))]
    pub instruction: String,
    pub duration_minutes: Option<u32>,
    pub tip: Option<String>,
}

/// Input for creating a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRecipe {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category: Category,
    pub cuisine: String,
    pub difficulty: Difficulty,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    #[validate(range(min = 1, message = "servings must be at least 1"))]
    pub servings: u32,
    #[validate(nested)]
    pub ingredients: Vec<NewIngredient>,
    #[validate(nested)]
    pub steps: Vec<NewStep>,
    pub nutrition: Option<NutritionInfo>,
    pub tags: Vec<String>,
    pub source_url: Option<String>,
}

/// Partial recipe update.
///
/// Scalar fields present in the update are patched; `ingredients`/`steps`
/// present means the full child sequence is replaced as a unit, absent means
/// the stored sequence is untouched. There is no per-child patching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Full replacement ingredient sequence; never sent as a scalar patch
    #[serde(skip)]
    pub ingredients: Option<Vec<NewIngredient>>,
    /// Full replacement step sequence; never sent as a scalar patch
    #[serde(skip)]
    pub steps: Option<Vec<NewStep>>,
}

impl RecipeUpdate {
    /// Whether any scalar field is present (the child sequences don't count;
    /// they are written through separate delete/insert statements).
    pub fn has_scalar_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.image_url.is_some()
            || self.category.is_some()
            || self.cuisine.is_some()
            || self.difficulty.is_some()
            || self.prep_time_minutes.is_some()
            || self.cook_time_minutes.is_some()
            || self.servings.is_some()
            || self.tags.is_some()
            || self.source_url.is_some()
    }

    /// Apply the scalar fields of this update to a stored recipe.
    /// Child sequences are handled separately by the mutation layer.
    pub fn apply_scalars(&self, recipe: &mut Recipe) {
        if let Some(v) = &self.title {
            recipe.title = v.clone();
        }
        if let Some(v) = &self.description {
            recipe.description = v.clone();
        }
        if let Some(v) = &self.image_url {
            recipe.image_url = Some(v.clone());
        }
        if let Some(v) = self.category {
            recipe.category = v;
        }
        if let Some(v) = &self.cuisine {
            recipe.cuisine = v.clone();
        }
        if let Some(v) = self.difficulty {
            recipe.difficulty = v;
        }
        if let Some(v) = self.prep_time_minutes {
            recipe.prep_time_minutes = v;
        }
        if let Some(v) = self.cook_time_minutes {
            recipe.cook_time_minutes = v;
        }
        if let Some(v) = self.servings {
            recipe.servings = v;
        }
        if let Some(v) = &self.tags {
            recipe.tags = v.clone();
        }
        if let Some(v) = &self.source_url {
            recipe.source_url = Some(v.clone());
        }
    }
}
