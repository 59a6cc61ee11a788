use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, entity::prelude::DateTimeWithTimeZone,
};

use super::{DaoResult, OrderFilter};
use crate::db::entities::prelude::{Customer, OrderItem};
use crate::db::entities::{customer, menu_item, order, order_item};

/// Read-only aggregate queries across orders, lines and menu items.
#[derive(Clone)]
pub struct ReportDao {
    db: DatabaseConnection,
}

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct MenuItemSales {
    pub menu_item_id: i32,
    pub name: String,
    pub quantity: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerQuantity {
    pub customer_id: i32,
    pub name: String,
    pub quantity: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, FromQueryResult)]
struct CustomerQuantityRow {
    customer_id: i32,
    name: String,
    // SUM over an outer join is NULL when nothing matched
    quantity: Option<i64>,
}

#[derive(Debug, FromQueryResult)]
struct RevenueRow {
    created_at: DateTimeWithTimeZone,
    price: f64,
    quantity: i32,
}

impl ReportDao {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    /// The menu item with the highest total quantity over all order lines,
    /// lowest id first on ties. `None` when nothing has been ordered.
    pub async fn best_seller(&self) -> DaoResult<Option<MenuItemSales>> {
        Ok(OrderItem::find()
            .select_only()
            .column_as(menu_item::Column::Id, "menu_item_id")
            .column_as(menu_item::Column::Name, "name")
            .column_as(order_item::Column::Quantity.sum(), "quantity")
            .join(JoinType::InnerJoin, order_item::Relation::MenuItem.def())
            .group_by(menu_item::Column::Id)
            .group_by(menu_item::Column::Name)
            .order_by_desc(order_item::Column::Quantity.sum())
            .order_by_asc(menu_item::Column::Id)
            .limit(1)
            .into_model::<MenuItemSales>()
            .one(&self.db)
            .await?)
    }

    /// Total quantity over every line of every order of the customer; zero
    /// when there are none. `None` when the customer does not exist.
    pub async fn customer_quantity(
        &self,
        customer_id: i32,
    ) -> DaoResult<Option<CustomerQuantity>> {
        let row = Customer::find()
            .select_only()
            .column_as(customer::Column::Id, "customer_id")
            .column_as(customer::Column::Name, "name")
            .column_as(order_item::Column::Quantity.sum(), "quantity")
            .join(JoinType::LeftJoin, customer::Relation::Order.def())
            .join(JoinType::LeftJoin, order::Relation::OrderItem.def())
            .filter(customer::Column::Id.eq(customer_id))
            .group_by(customer::Column::Id)
            .group_by(customer::Column::Name)
            .into_model::<CustomerQuantityRow>()
            .one(&self.db)
            .await?;

        Ok(row.map(|row| CustomerQuantity {
            customer_id: row.customer_id,
            name: row.name,
            quantity: row.quantity.unwrap_or(0),
        }))
    }

    /// Revenue per UTC calendar day at current menu prices, days ascending.
    /// Only `created_from` / `created_before` of the filter are meaningful.
    pub async fn daily_revenue(&self, filter: &OrderFilter) -> DaoResult<Vec<DailyRevenue>> {
        let query = OrderItem::find()
            .select_only()
            .column_as(order::Column::CreatedAt, "created_at")
            .column_as(menu_item::Column::Price, "price")
            .column_as(order_item::Column::Quantity, "quantity")
            .join(JoinType::InnerJoin, order_item::Relation::Order.def())
            .join(JoinType::InnerJoin, order_item::Relation::MenuItem.def());

        let rows = filter
            .apply(query)
            .order_by_asc(order::Column::CreatedAt)
            .into_model::<RevenueRow>()
            .all(&self.db)
            .await?;

        Ok(fold_daily_revenue(rows))
    }
}

fn fold_daily_revenue(rows: Vec<RevenueRow>) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        let date = row.created_at.with_timezone(&Utc).date_naive();
        *days.entry(date).or_insert(0.0) += row.price * f64::from(row.quantity);
    }

    days.into_iter()
        .map(|(date, revenue)| DailyRevenue { date, revenue })
        .collect()
}
