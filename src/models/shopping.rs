//! Shopping list item model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the user's shopping list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub amount: String,
    pub unit: String,
    /// Provenance: which recipe this item came from, if any
    pub recipe_id: Option<String>,
    pub recipe_name: Option<String>,
    pub is_checked: bool,
    pub added_at: DateTime<Utc>,
}

/// Input for adding items to the shopping list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShoppingItem {
    pub name: String,
    pub amount: String,
    pub unit: String,
}
