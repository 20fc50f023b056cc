// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! REST backend client speaking PostgREST conventions.
//!
//! Provides row-level operations for every collection:
//! - `?col=eq.val` filters, `order=` and `limit=` query params
//! - nested child embedding via `select=*,ingredients(*),steps(*)`
//! - batch inserts as JSON arrays with `Prefer: return=minimal`
//! - conflict-keyed upserts via `Prefer: resolution=merge-duplicates`

use crate::config::Config;
use crate::db::{collections, Backend};
use crate::error::{AppError, Result};
use crate::models::{
    Category, Difficulty, Favorite, Follow, Ingredient, MealPlanEntry, NutritionInfo, Recipe,
    RecentlyViewed, RecipeUpdate, Review, SharedRecipe, ShoppingListItem, Step, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// REST database client.
///
/// Holds `Option<RestClient>`: an engine configured without a backend URL gets
/// `None`, and every operation reports `BackendUnavailable`. The follow-graph
/// capability probe consumes that signal to select the local mirror.
#[derive(Clone)]
pub struct RestDb {
    client: Option<RestClient>,
}

impl RestDb {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Self {
        let client = config.api_url.as_ref().map(|url| {
            tracing::info!(url = %url, "REST backend configured");
            RestClient {
                http: reqwest::Client::new(),
                base_url: format!("{}/rest/v1", url),
                api_key: config.api_key.clone(),
            }
        });

        if client.is_none() {
            tracing::info!("No backend URL configured, running without remote store");
        }

        Self { client }
    }

    /// Create an unconfigured client (offline mode).
    ///
    /// All operations will return `BackendUnavailable` if called.
    pub fn offline() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or report offline mode.
    fn get_client(&self) -> Result<&RestClient> {
        self.client.as_ref().ok_or_else(|| {
            AppError::BackendUnavailable("backend not configured".to_string())
        })
    }
}

/// Low-level HTTP client with PostgREST request helpers.
#[derive(Clone, Debug)]
struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Select rows matching the given query parameters.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .request(reqwest::Method::GET, table)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;

        let response = check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::BackendUnavailable(format!("JSON parse error: {}", e)))
    }

    /// Insert one row or a batch (a JSON array body inserts one row per element).
    async fn insert<B: Serialize + ?Sized>(&self, table: &str, body: &B) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }

    /// Insert with conflict-keyed merge semantics.
    async fn upsert<B: Serialize + ?Sized>(
        &self,
        table: &str,
        on_conflict: &str,
        body: &B,
    ) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, table)
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }

    /// Patch rows matching the filters.
    async fn patch<B: Serialize + ?Sized>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        body: &B,
    ) -> Result<()> {
        let response = self
            .request(reqwest::Method::PATCH, table)
            .query(filters)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }

    /// Delete rows matching the filters.
    async fn delete(&self, table: &str, filters: &[(&str, String)]) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, table)
            .query(filters)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }
}

/// Check response status, surfacing failures as `BackendUnavailable`.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, "Backend request failed");
    Err(AppError::BackendUnavailable(format!(
        "HTTP {}: {}",
        status, body
    )))
}

/// Equality filter value with the column value URL-encoded.
fn eq(value: &str) -> String {
    format!("eq.{}", urlencoding::encode(value))
}

// ─── Wire Rows ───────────────────────────────────────────────

/// Ingredient row with its dense 0-based position column.
#[derive(Debug, Serialize, Deserialize)]
struct IngredientRow {
    id: String,
    recipe_id: String,
    position: u32,
    name: String,
    amount: String,
    unit: String,
}

/// Step row; the 1-based order is stored as `step_number`.
#[derive(Debug, Serialize, Deserialize)]
struct StepRow {
    id: String,
    recipe_id: String,
    step_number: u32,
    instruction: String,
    duration_minutes: Option<u32>,
    tip: Option<String>,
}

/// Recipe row as fetched with embedded children.
#[derive(Debug, Deserialize)]
struct RecipeRow {
    id: String,
    title: String,
    description: String,
    image_url: Option<String>,
    category: Category,
    cuisine: String,
    difficulty: Difficulty,
    prep_time_minutes: u32,
    cook_time_minutes: u32,
    servings: u32,
    #[serde(default)]
    ingredients: Vec<IngredientRow>,
    #[serde(default)]
    steps: Vec<StepRow>,
    nutrition: Option<NutritionInfo>,
    tags: Vec<String>,
    rating: f64,
    review_count: u32,
    created_at: DateTime<Utc>,
    source_url: Option<String>,
    author_id: Option<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(mut row: RecipeRow) -> Self {
        // Embedded child ordering is requested in the query, but the child
        // sequences must be ordered even if the server ignores the params.
        row.ingredients.sort_by_key(|i| i.position);
        row.steps.sort_by_key(|s| s.step_number);

        Recipe {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            category: row.category,
            cuisine: row.cuisine,
            difficulty: row.difficulty,
            prep_time_minutes: row.prep_time_minutes,
            cook_time_minutes: row.cook_time_minutes,
            servings: row.servings,
            ingredients: row
                .ingredients
                .into_iter()
                .map(|i| Ingredient {
                    id: i.id,
                    name: i.name,
                    amount: i.amount,
                    unit: i.unit,
                })
                .collect(),
            steps: row
                .steps
                .into_iter()
                .map(|s| Step {
                    id: s.id,
                    order: s.step_number,
                    instruction: s.instruction,
                    duration_minutes: s.duration_minutes,
                    tip: s.tip,
                })
                .collect(),
            nutrition: row.nutrition,
            tags: row.tags,
            rating: row.rating,
            review_count: row.review_count,
            created_at: row.created_at,
            source_url: row.source_url,
            author_id: row.author_id,
        }
    }
}

/// Recipe row for insertion (scalars only; children are separate inserts).
#[derive(Debug, Serialize)]
struct RecipeInsert<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    image_url: &'a Option<String>,
    category: Category,
    cuisine: &'a str,
    difficulty: Difficulty,
    prep_time_minutes: u32,
    cook_time_minutes: u32,
    servings: u32,
    nutrition: &'a Option<NutritionInfo>,
    tags: &'a [String],
    rating: f64,
    review_count: u32,
    created_at: DateTime<Utc>,
    source_url: &'a Option<String>,
    author_id: &'a Option<String>,
}

#[async_trait]
impl Backend for RestDb {
    // ─── Recipes ─────────────────────────────────────────────────

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let rows: Vec<RecipeRow> = self
            .get_client()?
            .select(
                collections::RECIPES,
                &[
                    ("select", "*,ingredients(*),steps(*)".to_string()),
                    ("order", "created_at.desc".to_string()),
                    ("ingredients.order", "position.asc".to_string()),
                    ("steps.order", "step_number.asc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        let row = RecipeInsert {
            id: &recipe.id,
            title: &recipe.title,
            description: &recipe.description,
            image_url: &recipe.image_url,
            category: recipe.category,
            cuisine: &recipe.cuisine,
            difficulty: recipe.difficulty,
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            servings: recipe.servings,
            nutrition: &recipe.nutrition,
            tags: &recipe.tags,
            rating: recipe.rating,
            review_count: recipe.review_count,
            created_at: recipe.created_at,
            source_url: &recipe.source_url,
            author_id: &recipe.author_id,
        };
        self.get_client()?.insert(collections::RECIPES, &row).await
    }

    async fn insert_ingredients(&self, recipe_id: &str, items: &[Ingredient]) -> Result<()> {
        let rows: Vec<IngredientRow> = items
            .iter()
            .enumerate()
            .map(|(position, item)| IngredientRow {
                id: item.id.clone(),
                recipe_id: recipe_id.to_string(),
                position: position as u32,
                name: item.name.clone(),
                amount: item.amount.clone(),
                unit: item.unit.clone(),
            })
            .collect();
        self.get_client()?
            .insert(collections::INGREDIENTS, &rows)
            .await
    }

    async fn insert_steps(&self, recipe_id: &str, steps: &[Step]) -> Result<()> {
        let rows: Vec<StepRow> = steps
            .iter()
            .map(|step| StepRow {
                id: step.id.clone(),
                recipe_id: recipe_id.to_string(),
                step_number: step.order,
                instruction: step.instruction.clone(),
                duration_minutes: step.duration_minutes,
                tip: step.tip.clone(),
            })
            .collect();
        self.get_client()?.insert(collections::STEPS, &rows).await
    }

    async fn delete_ingredients(&self, recipe_id: &str) -> Result<()> {
        self.get_client()?
            .delete(collections::INGREDIENTS, &[("recipe_id", eq(recipe_id))])
            .await
    }

    async fn delete_steps(&self, recipe_id: &str) -> Result<()> {
        self.get_client()?
            .delete(collections::STEPS, &[("recipe_id", eq(recipe_id))])
            .await
    }

    async fn update_recipe(&self, id: &str, update: &RecipeUpdate) -> Result<()> {
        self.get_client()?
            .patch(collections::RECIPES, &[("id", eq(id))], update)
            .await
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        self.get_client()?
            .delete(collections::RECIPES, &[("id", eq(id))])
            .await
    }

    // ─── Favorites ───────────────────────────────────────────────

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Favorite>> {
        self.get_client()?
            .select(collections::FAVORITES, &[("user_id", eq(user_id))])
            .await
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<()> {
        self.get_client()?
            .insert(collections::FAVORITES, favorite)
            .await
    }

    async fn delete_favorite(&self, user_id: &str, recipe_id: &str) -> Result<()> {
        self.get_client()?
            .delete(
                collections::FAVORITES,
                &[("user_id", eq(user_id)), ("recipe_id", eq(recipe_id))],
            )
            .await
    }

    // ─── Recently Viewed ─────────────────────────────────────────

    async fn list_recently_viewed(&self, user_id: &str) -> Result<Vec<RecentlyViewed>> {
        self.get_client()?
            .select(
                collections::RECENTLY_VIEWED,
                &[
                    ("user_id", eq(user_id)),
                    ("order", "viewed_at.desc".to_string()),
                    ("limit", "10".to_string()),
                ],
            )
            .await
    }

    async fn upsert_recently_viewed(&self, entry: &RecentlyViewed) -> Result<()> {
        self.get_client()?
            .upsert(collections::RECENTLY_VIEWED, "user_id,recipe_id", entry)
            .await
    }

    // ─── Reviews ─────────────────────────────────────────────────

    async fn list_reviews(&self, recipe_id: &str) -> Result<Vec<Review>> {
        self.get_client()?
            .select(
                collections::REVIEWS,
                &[
                    ("recipe_id", eq(recipe_id)),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
    }

    async fn insert_review(&self, review: &Review) -> Result<()> {
        self.get_client()?.insert(collections::REVIEWS, review).await
    }

    // ─── Users & Follows ─────────────────────────────────────────

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_client()?
            .select(
                collections::USERS,
                &[("order", "followers_count.desc".to_string())],
            )
            .await
    }

    async fn list_following(&self, user_id: &str) -> Result<Vec<Follow>> {
        self.get_client()?
            .select(collections::FOLLOWS, &[("follower_id", eq(user_id))])
            .await
    }

    async fn insert_follow(&self, follow: &Follow) -> Result<()> {
        self.get_client()?.insert(collections::FOLLOWS, follow).await
    }

    async fn delete_follow(&self, follower_id: &str, following_id: &str) -> Result<()> {
        self.get_client()?
            .delete(
                collections::FOLLOWS,
                &[
                    ("follower_id", eq(follower_id)),
                    ("following_id", eq(following_id)),
                ],
            )
            .await
    }

    // ─── Shopping List ───────────────────────────────────────────

    async fn list_shopping_items(&self, user_id: &str) -> Result<Vec<ShoppingListItem>> {
        self.get_client()?
            .select(
                collections::SHOPPING_LIST_ITEMS,
                &[
                    ("user_id", eq(user_id)),
                    ("order", "added_at.asc".to_string()),
                ],
            )
            .await
    }

    async fn insert_shopping_items(&self, items: &[ShoppingListItem]) -> Result<()> {
        self.get_client()?
            .insert(collections::SHOPPING_LIST_ITEMS, items)
            .await
    }

    async fn set_item_checked(&self, user_id: &str, item_id: &str, checked: bool) -> Result<()> {
        self.get_client()?
            .patch(
                collections::SHOPPING_LIST_ITEMS,
                &[("id", eq(item_id)), ("user_id", eq(user_id))],
                &serde_json::json!({ "is_checked": checked }),
            )
            .await
    }

    async fn delete_shopping_item(&self, user_id: &str, item_id: &str) -> Result<()> {
        self.get_client()?
            .delete(
                collections::SHOPPING_LIST_ITEMS,
                &[("id", eq(item_id)), ("user_id", eq(user_id))],
            )
            .await
    }

    async fn delete_checked_items(&self, user_id: &str) -> Result<()> {
        self.get_client()?
            .delete(
                collections::SHOPPING_LIST_ITEMS,
                &[("user_id", eq(user_id)), ("is_checked", "is.true".to_string())],
            )
            .await
    }

    async fn delete_all_items(&self, user_id: &str) -> Result<()> {
        self.get_client()?
            .delete(collections::SHOPPING_LIST_ITEMS, &[("user_id", eq(user_id))])
            .await
    }

    // ─── Meal Plan ───────────────────────────────────────────────

    async fn list_meal_plan_entries(&self, user_id: &str) -> Result<Vec<MealPlanEntry>> {
        self.get_client()?
            .select(
                collections::MEAL_PLAN_ENTRIES,
                &[
                    ("user_id", eq(user_id)),
                    ("order", "created_at.asc".to_string()),
                ],
            )
            .await
    }

    async fn insert_meal_plan_entry(&self, entry: &MealPlanEntry) -> Result<()> {
        self.get_client()?
            .insert(collections::MEAL_PLAN_ENTRIES, entry)
            .await
    }

    async fn delete_meal_plan_entry(&self, user_id: &str, entry_id: &str) -> Result<()> {
        self.get_client()?
            .delete(
                collections::MEAL_PLAN_ENTRIES,
                &[("id", eq(entry_id)), ("user_id", eq(user_id))],
            )
            .await
    }

    // ─── Shared Recipes ──────────────────────────────────────────

    async fn list_shared_recipes(&self, user_id: &str) -> Result<Vec<SharedRecipe>> {
        self.get_client()?
            .select(
                collections::SHARED_RECIPES,
                &[
                    ("to_user_id", eq(user_id)),
                    ("order", "shared_at.desc".to_string()),
                ],
            )
            .await
    }

    async fn insert_shared_recipes(&self, shares: &[SharedRecipe]) -> Result<()> {
        self.get_client()?
            .insert(collections::SHARED_RECIPES, shares)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filter_encodes_value() {
        assert_eq!(eq("abc-123"), "eq.abc-123");
        assert_eq!(eq("a b&c"), "eq.a%20b%26c");
    }

    #[test]
    fn test_recipe_row_orders_children_by_position() {
        let row: RecipeRow = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "title": "Pancakes",
            "description": "",
            "image_url": null,
            "category": "breakfast",
            "cuisine": "American",
            "difficulty": "Easy",
            "prep_time_minutes": 5,
            "cook_time_minutes": 10,
            "servings": 2,
            "ingredients": [
                {"id": "i2", "recipe_id": "r1", "position": 1, "name": "Milk", "amount": "1", "unit": "cup"},
                {"id": "i1", "recipe_id": "r1", "position": 0, "name": "Flour", "amount": "2", "unit": "cups"}
            ],
            "steps": [
                {"id": "s2", "recipe_id": "r1", "step_number": 2, "instruction": "Fry", "duration_minutes": 5, "tip": null},
                {"id": "s1", "recipe_id": "r1", "step_number": 1, "instruction": "Mix", "duration_minutes": null, "tip": null}
            ],
            "nutrition": null,
            "tags": [],
            "rating": 4.5,
            "review_count": 7,
            "created_at": "2024-01-15T10:00:00Z",
            "source_url": null,
            "author_id": null
        }))
        .unwrap();

        let recipe = Recipe::from(row);
        let ingredient_names: Vec<&str> =
            recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(ingredient_names, vec!["Flour", "Milk"]);
        assert_eq!(recipe.steps[0].order, 1);
        assert_eq!(recipe.steps[1].order, 2);
    }

    #[test]
    fn test_offline_client_reports_unavailable() {
        let db = RestDb::offline();
        assert!(matches!(
            db.get_client().unwrap_err(),
            AppError::BackendUnavailable(_)
        ));
    }
}
