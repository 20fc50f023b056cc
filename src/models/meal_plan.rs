//! Meal plan entry model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Meal slot within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        };
        f.write_str(name)
    }
}

/// One planned recipe in a (date, meal) slot.
///
/// A slot may hold several entries: a meal can be made of several recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanEntry {
    pub id: String,
    pub user_id: String,
    /// Calendar day with no time component
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: String,
    pub created_at: DateTime<Utc>,
}
