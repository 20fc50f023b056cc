//! Backend boundary: row-level operations against the remote store.

pub mod memory;
pub mod rest;

pub use memory::MemoryDb;
pub use rest::RestDb;

use crate::error::Result;
use crate::models::{
    Favorite, Follow, Ingredient, MealPlanEntry, Recipe, RecentlyViewed, RecipeUpdate, Review,
    SharedRecipe, ShoppingListItem, Step, User,
};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const RECIPES: &str = "recipes";
    pub const INGREDIENTS: &str = "ingredients";
    pub const STEPS: &str = "steps";
    pub const USERS: &str = "users";
    pub const FOLLOWS: &str = "follows";
    pub const FAVORITES: &str = "favorites";
    pub const RECENTLY_VIEWED: &str = "recently_viewed";
    pub const REVIEWS: &str = "reviews";
    pub const SHOPPING_LIST_ITEMS: &str = "shopping_list_items";
    pub const MEAL_PLAN_ENTRIES: &str = "meal_plan_entries";
    pub const SHARED_RECIPES: &str = "shared_recipes";
}

/// Row-level storage operations the query and mutation layers are built on.
///
/// Every write is a plain insert/update/delete; no server-side transaction is
/// assumed across calls. Reads return full materialized collections, recipes
/// with their child sequences inlined in order.
#[async_trait]
pub trait Backend: Send + Sync {
    // ─── Recipes ─────────────────────────────────────────────────
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;
    /// Insert the recipe row only; child sequences are written separately.
    async fn insert_recipe(&self, recipe: &Recipe) -> Result<()>;
    /// Bulk-insert an ingredient sequence; slice order becomes the stored
    /// dense 0-based position.
    async fn insert_ingredients(&self, recipe_id: &str, items: &[Ingredient]) -> Result<()>;
    /// Bulk-insert a step sequence with caller-supplied 1-based order.
    async fn insert_steps(&self, recipe_id: &str, steps: &[Step]) -> Result<()>;
    async fn delete_ingredients(&self, recipe_id: &str) -> Result<()>;
    async fn delete_steps(&self, recipe_id: &str) -> Result<()>;
    /// Patch the scalar fields present in `update`; children untouched.
    async fn update_recipe(&self, id: &str, update: &RecipeUpdate) -> Result<()>;
    /// Delete the recipe; child rows cascade via the storage layer's
    /// referential rules.
    async fn delete_recipe(&self, id: &str) -> Result<()>;

    // ─── Favorites ───────────────────────────────────────────────
    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Favorite>>;
    async fn insert_favorite(&self, favorite: &Favorite) -> Result<()>;
    async fn delete_favorite(&self, user_id: &str, recipe_id: &str) -> Result<()>;

    // ─── Recently Viewed ─────────────────────────────────────────
    /// Most recent first, capped at 10 rows.
    async fn list_recently_viewed(&self, user_id: &str) -> Result<Vec<RecentlyViewed>>;
    /// Insert or, on (user, recipe) conflict, update `viewed_at`.
    async fn upsert_recently_viewed(&self, entry: &RecentlyViewed) -> Result<()>;

    // ─── Reviews ─────────────────────────────────────────────────
    async fn list_reviews(&self, recipe_id: &str) -> Result<Vec<Review>>;
    async fn insert_review(&self, review: &Review) -> Result<()>;

    // ─── Users & Follows ─────────────────────────────────────────
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn list_following(&self, user_id: &str) -> Result<Vec<Follow>>;
    async fn insert_follow(&self, follow: &Follow) -> Result<()>;
    async fn delete_follow(&self, follower_id: &str, following_id: &str) -> Result<()>;

    // ─── Shopping List ───────────────────────────────────────────
    async fn list_shopping_items(&self, user_id: &str) -> Result<Vec<ShoppingListItem>>;
    async fn insert_shopping_items(&self, items: &[ShoppingListItem]) -> Result<()>;
    async fn set_item_checked(&self, user_id: &str, item_id: &str, checked: bool) -> Result<()>;
    async fn delete_shopping_item(&self, user_id: &str, item_id: &str) -> Result<()>;
    async fn delete_checked_items(&self, user_id: &str) -> Result<()>;
    async fn delete_all_items(&self, user_id: &str) -> Result<()>;

    // ─── Meal Plan ───────────────────────────────────────────────
    async fn list_meal_plan_entries(&self, user_id: &str) -> Result<Vec<MealPlanEntry>>;
    async fn insert_meal_plan_entry(&self, entry: &MealPlanEntry) -> Result<()>;
    async fn delete_meal_plan_entry(&self, user_id: &str, entry_id: &str) -> Result<()>;

    // ─── Shared Recipes ──────────────────────────────────────────
    /// Recipes shared *to* the given user.
    async fn list_shared_recipes(&self, user_id: &str) -> Result<Vec<SharedRecipe>>;
    async fn insert_shared_recipes(&self, shares: &[SharedRecipe]) -> Result<()>;
}
