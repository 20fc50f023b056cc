// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Derived views: pure projections over the base collections.
//!
//! Nothing here holds state or mutates its inputs; every view is recomputed
//! from the collections it is given. The services fetch the inputs through
//! the entity store and call into this module.

use crate::models::{
    MealPlanEntry, MealType, Recipe, RecentlyViewed, Review, ShoppingListItem, User,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// How many recipes the recently-viewed list shows.
const RECENT_RECIPES_CAP: usize = 10;

/// How many users the suggestion list shows.
const SUGGESTED_USERS_CAP: usize = 5;

/// Group label for shopping items with no recipe provenance.
pub const OTHER_ITEMS_GROUP: &str = "Other Items";

/// A recipe with its favorite flag for the current user.
#[derive(Debug, Clone)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub is_favorite: bool,
}

/// A shopping-list group: one recipe's items, or the "Other Items" bucket.
#[derive(Debug, Clone)]
pub struct ShoppingGroup {
    pub name: String,
    pub items: Vec<ShoppingListItem>,
}

/// A meal-plan entry resolved to its recipe.
#[derive(Debug, Clone)]
pub struct PlannedMeal {
    pub entry: MealPlanEntry,
    pub recipe: Recipe,
}

/// Annotate every recipe with membership in the user's favorite set.
pub fn annotate_favorites(recipes: &[Recipe], favorite_ids: &[String]) -> Vec<RecipeView> {
    recipes
        .iter()
        .map(|recipe| RecipeView {
            is_favorite: favorite_ids.iter().any(|id| *id == recipe.id),
            recipe: recipe.clone(),
        })
        .collect()
}

/// Only the favorited recipes.
pub fn favorites_only(views: &[RecipeView]) -> Vec<RecipeView> {
    views.iter().filter(|v| v.is_favorite).cloned().collect()
}

/// Recipes authored by the given user.
pub fn custom_recipes(recipes: &[Recipe], author_id: &str) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|r| r.author_id.as_deref() == Some(author_id))
        .cloned()
        .collect()
}

/// Map the recently-viewed rows through recipe lookup, preserving recency
/// order, dropping ids whose recipe no longer exists, deduplicating, and
/// capping at ten entries.
///
/// The rows arrive newest-first from the store; the cap and dedup are
/// re-applied here so the view holds regardless of what the fetch returned.
pub fn recent_recipes(entries: &[RecentlyViewed], recipes: &[Recipe]) -> Vec<Recipe> {
    let mut ordered = entries.to_vec();
    ordered.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));

    let mut seen: Vec<&str> = Vec::new();
    let mut result = Vec::new();
    for entry in &ordered {
        if seen.contains(&entry.recipe_id.as_str()) {
            continue;
        }
        seen.push(&entry.recipe_id);
        if let Some(recipe) = recipes.iter().find(|r| r.id == entry.recipe_id) {
            result.push(recipe.clone());
        }
        if result.len() == RECENT_RECIPES_CAP {
            break;
        }
    }
    result
}

/// Group shopping items by recipe provenance.
///
/// Items with no provenance land in the literal "Other Items" bucket; groups
/// iterate in insertion order of their first-seen key.
pub fn group_shopping_list(items: &[ShoppingListItem]) -> Vec<ShoppingGroup> {
    let mut groups: Vec<ShoppingGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let name = item
            .recipe_name
            .clone()
            .unwrap_or_else(|| OTHER_ITEMS_GROUP.to_string());

        let position = *index.entry(name.clone()).or_insert_with(|| {
            groups.push(ShoppingGroup {
                name,
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].items.push(item.clone());
    }

    groups
}

/// Entries in the exact (date, meal) slot, resolved to existing recipes, in
/// insertion order. Entries whose recipe is gone are silently dropped.
pub fn entries_for_slot(
    entries: &[MealPlanEntry],
    recipes: &[Recipe],
    date: NaiveDate,
    meal_type: MealType,
) -> Vec<PlannedMeal> {
    entries
        .iter()
        .filter(|e| e.date == date && e.meal_type == meal_type)
        .filter_map(|entry| {
            recipes
                .iter()
                .find(|r| r.id == entry.recipe_id)
                .map(|recipe| PlannedMeal {
                    entry: entry.clone(),
                    recipe: recipe.clone(),
                })
        })
        .collect()
}

/// Arithmetic mean of the review ratings, or `None` with no reviews.
///
/// Callers fall back to the recipe's seeded rating when this is `None`.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    Some(f64::from(total) / reviews.len() as f64)
}

/// Non-followed users ranked by follower count, truncated to five.
pub fn suggested_users(
    users: &[User],
    following_ids: &[String],
    current_user_id: Option<&str>,
) -> Vec<User> {
    let mut candidates: Vec<User> = users
        .iter()
        .filter(|u| Some(u.id.as_str()) != current_user_id)
        .filter(|u| !following_ids.iter().any(|id| *id == u.id))
        .cloned()
        .collect();
    candidates.sort_by(|a, b| b.followers_count.cmp(&a.followers_count));
    candidates.truncate(SUGGESTED_USERS_CAP);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Difficulty};
    use chrono::{Duration, TimeZone, Utc};

    fn make_recipe(id: &str, author_id: Option<&str>) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: format!("Recipe {}", id),
            description: String::new(),
            image_url: None,
            category: Category::Dinner,
            cuisine: "Test".to_string(),
            difficulty: Difficulty::Easy,
            prep_time_minutes: 5,
            cook_time_minutes: 10,
            servings: 2,
            ingredients: vec![],
            steps: vec![],
            nutrition: None,
            tags: vec![],
            rating: 4.0,
            review_count: 3,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            source_url: None,
            author_id: author_id.map(String::from),
        }
    }

    fn make_item(name: &str, recipe_name: Option<&str>) -> ShoppingListItem {
        ShoppingListItem {
            id: name.to_lowercase(),
            user_id: "u1".to_string(),
            name: name.to_string(),
            amount: "1".to_string(),
            unit: "pcs".to_string(),
            recipe_id: recipe_name.map(|_| "r1".to_string()),
            recipe_name: recipe_name.map(String::from),
            is_checked: false,
            added_at: Utc::now(),
        }
    }

    fn make_viewed(recipe_id: &str, minutes_ago: i64) -> RecentlyViewed {
        RecentlyViewed {
            user_id: "u1".to_string(),
            recipe_id: recipe_id.to_string(),
            viewed_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn make_user(id: &str, followers: u32) -> User {
        User {
            id: id.to_string(),
            username: id.to_string(),
            display_name: id.to_string(),
            avatar_url: None,
            bio: String::new(),
            recipes_count: 0,
            followers_count: followers,
            following_count: 0,
            is_verified: false,
            joined_at: Utc::now(),
        }
    }

    fn make_review(rating: u8) -> Review {
        Review {
            id: format!("rev-{}", rating),
            recipe_id: "r1".to_string(),
            rating,
            comment: String::new(),
            author_name: "tester".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_annotate_and_filter_favorites() {
        let recipes = vec![make_recipe("r1", None), make_recipe("r2", None)];
        let views = annotate_favorites(&recipes, &["r2".to_string()]);

        assert!(!views[0].is_favorite);
        assert!(views[1].is_favorite);

        let favorites = favorites_only(&views);
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].recipe.id, "r2");
    }

    #[test]
    fn test_custom_recipes_filters_by_author() {
        let recipes = vec![
            make_recipe("r1", Some("alice")),
            make_recipe("r2", Some("bob")),
            make_recipe("r3", None),
        ];
        let custom = custom_recipes(&recipes, "alice");
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].id, "r1");
    }

    #[test]
    fn test_recent_recipes_order_and_dangling() {
        let recipes = vec![make_recipe("r1", None), make_recipe("r2", None)];
        // r-gone was viewed most recently but its recipe is deleted
        let entries = vec![
            make_viewed("r1", 30),
            make_viewed("r-gone", 1),
            make_viewed("r2", 10),
        ];

        let recents = recent_recipes(&entries, &recipes);
        let ids: Vec<&str> = recents.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r1"]);
    }

    #[test]
    fn test_recent_recipes_capped_and_deduplicated() {
        let recipes: Vec<Recipe> = (0..15).map(|i| make_recipe(&format!("r{}", i), None)).collect();
        let mut entries: Vec<RecentlyViewed> =
            (0..15).map(|i| make_viewed(&format!("r{}", i), i)).collect();
        // A duplicate view of r3 must not produce a second entry
        entries.push(make_viewed("r3", 0));

        let recents = recent_recipes(&entries, &recipes);
        assert_eq!(recents.len(), 10);
        let r3_count = recents.iter().filter(|r| r.id == "r3").count();
        assert_eq!(r3_count, 1);
        // The duplicate has the freshest timestamp, so r3 leads
        assert_eq!(recents[0].id, "r3");
    }

    #[test]
    fn test_group_shopping_list() {
        let items = vec![
            make_item("Salt", Some("Soup")),
            make_item("Pepper", Some("Soup")),
            make_item("Gum", None),
        ];

        let groups = group_shopping_list(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Soup");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].items[0].name, "Salt");
        assert_eq!(groups[0].items[1].name, "Pepper");
        assert_eq!(groups[1].name, OTHER_ITEMS_GROUP);
        assert_eq!(groups[1].items[0].name, "Gum");
    }

    #[test]
    fn test_group_order_is_first_seen() {
        let items = vec![
            make_item("Gum", None),
            make_item("Salt", Some("Soup")),
            make_item("Flour", None),
        ];

        let groups = group_shopping_list(&items);
        assert_eq!(groups[0].name, OTHER_ITEMS_GROUP);
        assert_eq!(groups[1].name, "Soup");
        assert_eq!(groups[0].items.len(), 2);
    }

    #[test]
    fn test_average_rating() {
        let reviews = vec![make_review(4), make_review(5), make_review(3)];
        assert_eq!(average_rating(&reviews), Some(4.0));
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn test_entries_for_slot() {
        let recipes = vec![make_recipe("r1", None), make_recipe("r2", None)];
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let other_date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        let make_entry = |id: &str, date: NaiveDate, meal: MealType, recipe: &str| MealPlanEntry {
            id: id.to_string(),
            user_id: "u1".to_string(),
            date,
            meal_type: meal,
            recipe_id: recipe.to_string(),
            created_at: Utc::now(),
        };

        let entries = vec![
            make_entry("e1", date, MealType::Dinner, "r1"),
            make_entry("e2", date, MealType::Lunch, "r1"),
            make_entry("e3", other_date, MealType::Dinner, "r2"),
            make_entry("e4", date, MealType::Dinner, "r2"),
            make_entry("e5", date, MealType::Dinner, "r-gone"),
        ];

        let meals = entries_for_slot(&entries, &recipes, date, MealType::Dinner);
        let ids: Vec<&str> = meals.iter().map(|m| m.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e4"]);
    }

    #[test]
    fn test_suggested_users() {
        let users = vec![
            make_user("a", 10),
            make_user("b", 50),
            make_user("c", 30),
            make_user("d", 5),
            make_user("e", 40),
            make_user("f", 20),
            make_user("me", 99),
        ];
        let following = vec!["c".to_string()];

        let suggested = suggested_users(&users, &following, Some("me"));
        let ids: Vec<&str> = suggested.iter().map(|u| u.id.as_str()).collect();
        // Followed and self excluded, followers descending, capped at five
        assert_eq!(ids, vec!["b", "e", "f", "a", "d"]);
    }
}
