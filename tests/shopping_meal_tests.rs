// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

mod common;

use chrono::NaiveDate;
use common::{new_recipe, signed_in_app};
use forkful_data::models::{MealType, NewShoppingItem};
use forkful_data::views::OTHER_ITEMS_GROUP;

fn item(name: &str) -> NewShoppingItem {
    NewShoppingItem {
        name: name.to_string(),
        amount: "1".to_string(),
        unit: "pcs".to_string(),
    }
}

#[tokio::test]
async fn test_items_group_by_recipe_provenance() {
    let app = signed_in_app().await;

    app.state
        .shopping
        .add_items(
            vec![item("Salt"), item("Pepper")],
            Some(("r-soup".to_string(), "Soup".to_string())),
        )
        .await
        .unwrap();
    app.state.shopping.add_items(vec![item("Gum")], None).await.unwrap();

    let groups = app.state.shopping.grouped_items().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "Soup");
    let names: Vec<&str> = groups[0].items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Salt", "Pepper"]);
    assert_eq!(groups[1].name, OTHER_ITEMS_GROUP);
    assert_eq!(groups[1].items[0].name, "Gum");
}

#[tokio::test]
async fn test_toggle_and_clear_checked() {
    let app = signed_in_app().await;
    app.state
        .shopping
        .add_items(vec![item("Milk"), item("Bread"), item("Jam")], None)
        .await
        .unwrap();

    let groups = app.state.shopping.grouped_items().await.unwrap();
    let milk_id = groups[0]
        .items
        .iter()
        .find(|i| i.name == "Milk")
        .unwrap()
        .id
        .clone();

    assert!(app.state.shopping.toggle_checked(&milk_id).await.unwrap());

    app.state.shopping.clear_checked().await.unwrap();
    let groups = app.state.shopping.grouped_items().await.unwrap();
    let names: Vec<&str> = groups[0].items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Bread", "Jam"]);

    app.state.shopping.clear_all().await.unwrap();
    assert!(app.state.shopping.grouped_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_single_item() {
    let app = signed_in_app().await;
    app.state
        .shopping
        .add_items(vec![item("Milk"), item("Bread")], None)
        .await
        .unwrap();

    let groups = app.state.shopping.grouped_items().await.unwrap();
    let bread_id = groups[0]
        .items
        .iter()
        .find(|i| i.name == "Bread")
        .unwrap()
        .id
        .clone();

    app.state.shopping.remove_item(&bread_id).await.unwrap();

    let groups = app.state.shopping.grouped_items().await.unwrap();
    assert_eq!(groups[0].items.len(), 1);
    assert_eq!(groups[0].items[0].name, "Milk");
}

#[tokio::test]
async fn test_meal_plan_slot_lookup() {
    let app = signed_in_app().await;
    let pasta = app
        .state
        .recipes
        .add_recipe(new_recipe("Pasta", &["Pasta"]))
        .await
        .unwrap();
    let salad = app
        .state
        .recipes
        .add_recipe(new_recipe("Salad", &["Greens"]))
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let other_date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

    app.state
        .meal_plan
        .add_entry(date, MealType::Dinner, &pasta.id)
        .await
        .unwrap();
    app.state
        .meal_plan
        .add_entry(date, MealType::Lunch, &pasta.id)
        .await
        .unwrap();
    app.state
        .meal_plan
        .add_entry(other_date, MealType::Dinner, &salad.id)
        .await
        .unwrap();
    // A second recipe in the same slot
    app.state
        .meal_plan
        .add_entry(date, MealType::Dinner, &salad.id)
        .await
        .unwrap();
    // Entry pointing at a recipe that no longer exists is dropped silently
    app.state
        .meal_plan
        .add_entry(date, MealType::Dinner, "r-gone")
        .await
        .unwrap();

    let meals = app
        .state
        .meal_plan
        .entries_for_slot(date, MealType::Dinner)
        .await
        .unwrap();
    let titles: Vec<&str> = meals.iter().map(|m| m.recipe.title.as_str()).collect();
    assert_eq!(titles, vec!["Pasta", "Salad"]);
}

#[tokio::test]
async fn test_remove_meal_plan_entry() {
    let app = signed_in_app().await;
    let pasta = app
        .state
        .recipes
        .add_recipe(new_recipe("Pasta", &["Pasta"]))
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let entry = app
        .state
        .meal_plan
        .add_entry(date, MealType::Breakfast, &pasta.id)
        .await
        .unwrap();

    app.state.meal_plan.remove_entry(&entry.id).await.unwrap();
    let meals = app
        .state
        .meal_plan
        .entries_for_slot(date, MealType::Breakfast)
        .await
        .unwrap();
    assert!(meals.is_empty());
}
