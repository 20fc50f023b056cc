// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Meal plan service.

use crate::db::Backend;
use crate::error::Result;
use crate::models::{MealPlanEntry, MealType};
use crate::session::Session;
use crate::store::Collections;
use crate::views::{self, PlannedMeal};
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

/// The current user's meal plan.
#[derive(Clone)]
pub struct MealPlanService {
    db: Arc<dyn Backend>,
    session: Session,
    store: Arc<Collections>,
}

impl MealPlanService {
    pub fn new(db: Arc<dyn Backend>, session: Session, store: Arc<Collections>) -> Self {
        Self { db, session, store }
    }

    /// Planned recipes in one (date, meal) slot, in insertion order.
    /// Entries whose recipe no longer exists are dropped.
    pub async fn entries_for_slot(
        &self,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Result<Vec<PlannedMeal>> {
        let Some(user_id) = self.session.current_user_id() else {
            return Ok(Vec::new());
        };
        let (entries, recipes) = tokio::try_join!(
            self.store
                .meal_plan
                .get_or_fetch(&user_id, self.db.list_meal_plan_entries(&user_id)),
            self.store.recipes.get_or_fetch(&(), self.db.list_recipes()),
        )?;
        Ok(views::entries_for_slot(&entries, &recipes, date, meal_type))
    }

    /// Plan a recipe into a slot. A slot may hold several recipes.
    pub async fn add_entry(
        &self,
        date: NaiveDate,
        meal_type: MealType,
        recipe_id: &str,
    ) -> Result<MealPlanEntry> {
        let user_id = self.session.require_user_id()?;
        let entry = MealPlanEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            date,
            meal_type,
            recipe_id: recipe_id.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.db.insert_meal_plan_entry(&entry).await?;
        self.store.meal_plan.invalidate(&user_id);
        tracing::info!(date = %date, meal = %meal_type, recipe_id, "Meal plan entry added");
        Ok(entry)
    }

    /// Remove one planned entry by id.
    pub async fn remove_entry(&self, entry_id: &str) -> Result<()> {
        let user_id = self.session.require_user_id()?;
        self.db.delete_meal_plan_entry(&user_id, entry_id).await?;
        self.store.meal_plan.invalidate(&user_id);
        Ok(())
    }
}
