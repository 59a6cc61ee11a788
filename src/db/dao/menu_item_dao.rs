use std::collections::BTreeSet;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
};

use super::{DaoBase, DaoResult};
use crate::db::entities::prelude::{MenuItem, OrderItem};
use crate::db::entities::{menu_item, order_item};

#[derive(Clone)]
pub struct MenuItemDao {
    db: DatabaseConnection,
}

impl DaoBase for MenuItemDao {
    type Entity = MenuItem;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Columns to overwrite on a menu item; `None` leaves the stored value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuItemChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub calories: Option<i32>,
}

impl MenuItemDao {
    pub async fn update_menu_item(
        &self,
        id: i32,
        changes: MenuItemChanges,
    ) -> DaoResult<menu_item::Model> {
        self.update(id, move |active| {
            if let Some(name) = changes.name {
                active.name = Set(name);
            }
            if let Some(price) = changes.price {
                active.price = Set(price);
            }
            if let Some(calories) = changes.calories {
                active.calories = Set(calories);
            }
        })
        .await
    }

    /// Number of order lines that still point at the menu item.
    pub async fn count_order_lines(&self, id: i32) -> DaoResult<u64> {
        Ok(OrderItem::find()
            .filter(order_item::Column::MenuItemId.eq(id))
            .count(&self.db)
            .await?)
    }

    /// The ids from `ids` that have no menu item, ascending and deduplicated.
    pub async fn missing_ids(&self, ids: &[i32]) -> DaoResult<Vec<i32>> {
        let wanted: BTreeSet<i32> = ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let found: BTreeSet<i32> = MenuItem::find()
            .select_only()
            .column(menu_item::Column::Id)
            .filter(menu_item::Column::Id.is_in(wanted.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        Ok(wanted.difference(&found).copied().collect())
    }
}
