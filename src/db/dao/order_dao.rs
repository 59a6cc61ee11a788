use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, entity::prelude::DateTimeWithTimeZone,
};

use super::{DaoBase, DaoResult};
use crate::db::entities::prelude::{Order, OrderItem};
use crate::db::entities::{customer, menu_item, order, order_item};

#[derive(Clone)]
pub struct OrderDao {
    db: DatabaseConnection,
}

impl DaoBase for OrderDao {
    type Entity = Order;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Restricts which orders a read sees. `created_before` is exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub order_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub created_from: Option<DateTimeWithTimeZone>,
    pub created_before: Option<DateTimeWithTimeZone>,
}

impl OrderFilter {
    pub fn for_order(order_id: i32) -> Self {
        Self {
            order_id: Some(order_id),
            ..Default::default()
        }
    }

    /// Adds the filter's conditions on the `orders` columns to `query`.
    pub(crate) fn apply<Q: QueryFilter>(&self, mut query: Q) -> Q {
        if let Some(id) = self.order_id {
            query = query.filter(order::Column::Id.eq(id));
        }
        if let Some(customer_id) = self.customer_id {
            query = query.filter(order::Column::CustomerId.eq(customer_id));
        }
        if let Some(from) = self.created_from {
            query = query.filter(order::Column::CreatedAt.gte(from));
        }
        if let Some(before) = self.created_before {
            query = query.filter(order::Column::CreatedAt.lt(before));
        }
        query
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewOrderLine {
    pub menu_item_id: i32,
    pub quantity: i32,
}

/// One row of `orders ⋈ customers ⟕ order_items ⟕ menu_items`. The line
/// columns are all `None` for an order without lines.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct OrderLineRow {
    pub order_id: i32,
    pub customer_id: i32,
    pub customer_name: String,
    pub created_at: DateTimeWithTimeZone,
    pub line_id: Option<i32>,
    pub quantity: Option<i32>,
    pub menu_item_id: Option<i32>,
    pub menu_item_name: Option<String>,
    pub price: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuItemSnapshot {
    pub id: i32,
    pub name: String,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderLineSummary {
    pub id: i32,
    pub quantity: i32,
    pub menu_item: MenuItemSnapshot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderSummary {
    pub id: i32,
    pub customer_id: i32,
    pub customer_name: String,
    pub created_at: DateTimeWithTimeZone,
    pub items: Vec<OrderLineSummary>,
}

impl OrderLineRow {
    fn line(&self) -> Option<OrderLineSummary> {
        Some(OrderLineSummary {
            id: self.line_id?,
            quantity: self.quantity?,
            menu_item: MenuItemSnapshot {
                id: self.menu_item_id?,
                name: self.menu_item_name.clone()?,
                price: self.price?,
            },
        })
    }
}

/// Folds joined rows into one summary per order, keeping the order in which
/// each order id is first seen.
pub fn group_order_lines(rows: Vec<OrderLineRow>) -> Vec<OrderSummary> {
    let mut orders: Vec<OrderSummary> = Vec::new();
    let mut positions: HashMap<i32, usize> = HashMap::new();

    for row in rows {
        let line = row.line();
        let index = *positions.entry(row.order_id).or_insert_with(|| {
            orders.push(OrderSummary {
                id: row.order_id,
                customer_id: row.customer_id,
                customer_name: row.customer_name.clone(),
                created_at: row.created_at,
                items: Vec::new(),
            });
            orders.len() - 1
        });

        if let Some(line) = line {
            orders[index].items.push(line);
        }
    }

    orders
}

impl OrderDao {
    /// Inserts the order row, then all of its lines with one multi-row INSERT.
    pub async fn create_order(
        &self,
        customer_id: i32,
        lines: &[NewOrderLine],
    ) -> DaoResult<order::Model> {
        let model = order::ActiveModel {
            customer_id: Set(customer_id),
            ..Default::default()
        };
        let order = self.create(model).await?;
        self.insert_lines(order.id, lines).await?;
        Ok(order)
    }

    async fn insert_lines(&self, order_id: i32, lines: &[NewOrderLine]) -> DaoResult<()> {
        if lines.is_empty() {
            return Ok(());
        }

        let now = Utc::now().fixed_offset();
        let models = lines.iter().map(|line| order_item::ActiveModel {
            order_id: Set(order_id),
            menu_item_id: Set(line.menu_item_id),
            quantity: Set(line.quantity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });

        OrderItem::insert_many(models)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn find_lines(&self, filter: &OrderFilter) -> DaoResult<Vec<OrderLineRow>> {
        let query = Order::find()
            .select_only()
            .column_as(order::Column::Id, "order_id")
            .column_as(order::Column::CustomerId, "customer_id")
            .column_as(customer::Column::Name, "customer_name")
            .column_as(order::Column::CreatedAt, "created_at")
            .column_as(order_item::Column::Id, "line_id")
            .column_as(order_item::Column::Quantity, "quantity")
            .column_as(menu_item::Column::Id, "menu_item_id")
            .column_as(menu_item::Column::Name, "menu_item_name")
            .column_as(menu_item::Column::Price, "price")
            .join(JoinType::InnerJoin, order::Relation::Customer.def())
            .join(JoinType::LeftJoin, order::Relation::OrderItem.def())
            .join(JoinType::LeftJoin, order_item::Relation::MenuItem.def());

        Ok(filter
            .apply(query)
            .order_by_asc(order::Column::Id)
            .order_by_asc(order_item::Column::Id)
            .into_model::<OrderLineRow>()
            .all(&self.db)
            .await?)
    }

    pub async fn list_summaries(&self, filter: &OrderFilter) -> DaoResult<Vec<OrderSummary>> {
        Ok(group_order_lines(self.find_lines(filter).await?))
    }

    pub async fn find_summary(&self, id: i32) -> DaoResult<OrderSummary> {
        self.list_summaries(&OrderFilter::for_order(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn set_customer(&self, id: i32, customer_id: i32) -> DaoResult<order::Model> {
        self.update(id, move |active| {
            active.customer_id = Set(customer_id);
        })
        .await
    }

    /// Drops every line of the order and inserts `lines` in their place.
    pub async fn replace_lines(&self, order_id: i32, lines: &[NewOrderLine]) -> DaoResult<()> {
        OrderItem::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&self.db)
            .await?;
        self.insert_lines(order_id, lines).await
    }

    /// Deletes the order's lines, then the order.
    pub async fn delete_order(&self, id: i32) -> DaoResult<i32> {
        OrderItem::delete_many()
            .filter(order_item::Column::OrderId.eq(id))
            .exec(&self.db)
            .await?;
        self.delete(id).await
    }

    pub async fn ids_for_customer(&self, customer_id: i32) -> DaoResult<Vec<i32>> {
        Ok(Order::find()
            .select_only()
            .column(order::Column::Id)
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_asc(order::Column::Id)
            .into_tuple::<i32>()
            .all(&self.db)
            .await?)
    }

    /// Deletes every order of the customer along with their lines and
    /// returns how many orders went away.
    pub async fn delete_for_customer(&self, customer_id: i32) -> DaoResult<u64> {
        let order_ids = self.ids_for_customer(customer_id).await?;
        if order_ids.is_empty() {
            return Ok(0);
        }

        OrderItem::delete_many()
            .filter(order_item::Column::OrderId.is_in(order_ids))
            .exec(&self.db)
            .await?;
        let result = Order::delete_many()
            .filter(order::Column::CustomerId.eq(customer_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
