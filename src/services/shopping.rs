// SPDX-License-Identifier: MIT
// Copyright 2026 Forkful Contributors

//! Shopping list service.

use crate::db::Backend;
use crate::error::{AppError, Result};
use crate::models::{NewShoppingItem, ShoppingListItem};
use crate::session::Session;
use crate::store::Collections;
use crate::views::{self, ShoppingGroup};
use std::sync::Arc;
use uuid::Uuid;

/// The current user's shopping list.
#[derive(Clone)]
pub struct ShoppingListService {
    db: Arc<dyn Backend>,
    session: Session,
    store: Arc<Collections>,
}

impl ShoppingListService {
    pub fn new(db: Arc<dyn Backend>, session: Session, store: Arc<Collections>) -> Self {
        Self { db, session, store }
    }

    /// The list grouped by recipe provenance, unattributed items last seen
    /// first under "Other Items".
    pub async fn grouped_items(&self) -> Result<Vec<ShoppingGroup>> {
        let Some(user_id) = self.session.current_user_id() else {
            return Ok(Vec::new());
        };
        let items = self
            .store
            .shopping
            .get_or_fetch(&user_id, self.db.list_shopping_items(&user_id))
            .await?;
        Ok(views::group_shopping_list(&items))
    }

    /// Add a batch of items, stamping recipe provenance when given.
    pub async fn add_items(
        &self,
        items: Vec<NewShoppingItem>,
        provenance: Option<(String, String)>,
    ) -> Result<()> {
        let user_id = self.session.require_user_id()?;
        if items.is_empty() {
            return Ok(());
        }

        let (recipe_id, recipe_name) = match provenance {
            Some((id, name)) => (Some(id), Some(name)),
            None => (None, None),
        };
        let added_at = chrono::Utc::now();
        let rows: Vec<ShoppingListItem> = items
            .into_iter()
            .map(|item| ShoppingListItem {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.clone(),
                name: item.name,
                amount: item.amount,
                unit: item.unit,
                recipe_id: recipe_id.clone(),
                recipe_name: recipe_name.clone(),
                is_checked: false,
                added_at,
            })
            .collect();

        self.db.insert_shopping_items(&rows).await?;
        self.store.shopping.invalidate(&user_id);
        tracing::info!(count = rows.len(), "Shopping items added");
        Ok(())
    }

    /// Flip the checked flag of exactly one item.
    pub async fn toggle_checked(&self, item_id: &str) -> Result<bool> {
        let user_id = self.session.require_user_id()?;
        let items = self
            .store
            .shopping
            .get_or_fetch(&user_id, self.db.list_shopping_items(&user_id))
            .await?;
        let item = items
            .iter()
            .find(|i| i.id == item_id)
            .ok_or_else(|| AppError::NotFound(format!("shopping item {}", item_id)))?;

        let checked = !item.is_checked;
        self.db.set_item_checked(&user_id, item_id, checked).await?;
        self.store.shopping.invalidate(&user_id);
        Ok(checked)
    }

    /// Remove one item.
    pub async fn remove_item(&self, item_id: &str) -> Result<()> {
        let user_id = self.session.require_user_id()?;
        self.db.delete_shopping_item(&user_id, item_id).await?;
        self.store.shopping.invalidate(&user_id);
        Ok(())
    }

    /// Remove every checked item.
    pub async fn clear_checked(&self) -> Result<()> {
        let user_id = self.session.require_user_id()?;
        self.db.delete_checked_items(&user_id).await?;
        self.store.shopping.invalidate(&user_id);
        tracing::info!("Checked shopping items cleared");
        Ok(())
    }

    /// Empty the list.
    pub async fn clear_all(&self) -> Result<()> {
        let user_id = self.session.require_user_id()?;
        self.db.delete_all_items(&user_id).await?;
        self.store.shopping.invalidate(&user_id);
        tracing::info!("Shopping list cleared");
        Ok(())
    }
}
