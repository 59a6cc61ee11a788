use chrono::{NaiveDate, NaiveTime};
use sea_orm::entity::prelude::DateTimeWithTimeZone;

use crate::{
    db::dao::{
        BaseEntity, CustomerDao, DaoBase, MenuItemDao, NewOrderLine, OrderDao, OrderFilter,
        OrderSummary,
    },
    db::entities::prelude::{Customer, MenuItem},
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
    services::validation::{null_not_allowed, validate_quantity},
    sparse::Sparse,
};

#[derive(Clone)]
pub struct OrderService {
    order_dao: OrderDao,
    customer_dao: CustomerDao,
    menu_item_dao: MenuItemDao,
}

/// Builds an order filter from an optional customer and an inclusive
/// `from..=to` range of UTC calendar days.
pub fn order_filter(
    customer_id: Option<i32>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<OrderFilter, AppError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::bad_request("`from` must not be after `to`"));
        }
    }

    Ok(OrderFilter {
        order_id: None,
        customer_id,
        created_from: from.map(start_of_day),
        // the last representable day has no upper bound
        created_before: to.and_then(|to| to.succ_opt()).map(start_of_day),
    })
}

fn start_of_day(date: NaiveDate) -> DateTimeWithTimeZone {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

impl OrderService {
    pub fn new(
        order_dao: OrderDao,
        customer_dao: CustomerDao,
        menu_item_dao: MenuItemDao,
    ) -> Self {
        Self {
            order_dao,
            customer_dao,
            menu_item_dao,
        }
    }

    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<OrderSummary>, AppError> {
        self.order_dao
            .list_summaries(filter)
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    pub async fn require_order(&self, id: i32) -> Result<OrderSummary, AppError> {
        self.order_dao
            .find_summary(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    /// Checks the customer and every menu item before writing anything, then
    /// inserts the order and its lines.
    pub async fn create_order(
        &self,
        customer_id: i32,
        lines: Vec<NewOrderLine>,
    ) -> Result<OrderSummary, AppError> {
        let lines = validate_lines(lines)?;
        self.require_customer(customer_id).await?;
        self.require_menu_items(&lines).await?;

        let order = self
            .order_dao
            .create_order(customer_id, &lines)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))?;
        tracing::info!(
            order_id = order.id,
            customer_id,
            lines = lines.len(),
            "order created"
        );

        self.require_order(order.id).await
    }

    /// `items`, when present, replaces every line of the order.
    pub async fn update_order(
        &self,
        id: i32,
        customer_id: Sparse<i32>,
        items: Sparse<Vec<NewOrderLine>>,
    ) -> Result<(), AppError> {
        let customer_id = customer_id.required(null_not_allowed("customer_id"))?;
        let items = items
            .required(null_not_allowed("items"))?
            .map(validate_lines)
            .transpose()?;

        self.require_exists(id).await?;
        if let Some(customer_id) = customer_id {
            self.require_customer(customer_id).await?;
        }
        if let Some(items) = &items {
            self.require_menu_items(items).await?;
        }

        if let Some(customer_id) = customer_id {
            self.order_dao
                .set_customer(id, customer_id)
                .await
                .map_err(|err| self.map_error(CrudOp::Update, err))?;
        }
        if let Some(items) = &items {
            self.order_dao
                .replace_lines(id, items)
                .await
                .map_err(|err| self.map_error(CrudOp::Update, err))?;
        }

        tracing::info!(order_id = id, "order updated");
        Ok(())
    }

    pub async fn delete_order(&self, id: i32) -> Result<(), AppError> {
        self.require_exists(id).await?;
        self.order_dao
            .delete_order(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Delete, err))?;
        tracing::info!(order_id = id, "order deleted");
        Ok(())
    }

    async fn require_customer(&self, customer_id: i32) -> Result<(), AppError> {
        let exists = self
            .customer_dao
            .exists(customer_id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        if !exists {
            return Err(AppError::entity_not_found(Customer::LABEL, customer_id));
        }
        Ok(())
    }

    async fn require_menu_items(&self, lines: &[NewOrderLine]) -> Result<(), AppError> {
        let ids: Vec<i32> = lines.iter().map(|line| line.menu_item_id).collect();
        let missing = self
            .menu_item_dao
            .missing_ids(&ids)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;

        match missing.first() {
            Some(id) => Err(AppError::entity_not_found(MenuItem::LABEL, *id)),
            None => Ok(()),
        }
    }
}

fn validate_lines(lines: Vec<NewOrderLine>) -> Result<Vec<NewOrderLine>, AppError> {
    for line in &lines {
        validate_quantity(line.quantity)?;
    }
    Ok(lines)
}

impl CrudService for OrderService {
    type Dao = OrderDao;

    fn dao(&self) -> &Self::Dao {
        &self.order_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Order create failed",
            find_failed: "Order lookup failed",
            update_failed: "Order update failed",
            delete_failed: "Order delete failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use axum::http::StatusCode;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};

    use super::*;
    use crate::db::entities::order;

    fn service(db: &DatabaseConnection) -> OrderService {
        OrderService::new(OrderDao::new(db), CustomerDao::new(db), MenuItemDao::new(db))
    }

    fn count(value: i64) -> Vec<BTreeMap<&'static str, Value>> {
        vec![BTreeMap::from([("num_items", Value::from(value))])]
    }

    fn ids(values: &[i32]) -> Vec<BTreeMap<&'static str, Value>> {
        values
            .iter()
            .map(|id| BTreeMap::from([("id", Value::from(*id))]))
            .collect()
    }

    fn line(menu_item_id: i32, quantity: i32) -> NewOrderLine {
        NewOrderLine {
            menu_item_id,
            quantity,
        }
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("date")
    }

    #[test]
    fn filter_range_is_inclusive_of_the_last_day() {
        let filter = order_filter(Some(3), Some(date("2024-01-01")), Some(date("2024-01-31")))
            .expect("valid range");

        assert_eq!(filter.customer_id, Some(3));
        assert_eq!(
            filter.created_from.map(|ts| ts.to_rfc3339()),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
        assert_eq!(
            filter.created_before.map(|ts| ts.to_rfc3339()),
            Some("2024-02-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn reversed_range_is_bad_request() {
        let err = order_filter(None, Some(date("2024-02-01")), Some(date("2024-01-01")))
            .expect_err("reversed");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .create_order(1, vec![line(1, 2), line(2, 0)])
            .await
            .expect_err("quantity");
        assert_eq!(err.message(), "Quantity must be at least 1");
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count(0)])
            .into_connection();

        let err = service(&db)
            .create_order(5, vec![line(1, 1)])
            .await
            .expect_err("customer");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Customer with ID 5 not found.");
    }

    #[tokio::test]
    async fn unknown_menu_item_is_reported_without_writing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count(1), ids(&[1])])
            .into_connection();

        let err = service(&db)
            .create_order(1, vec![line(1, 1), line(42, 2)])
            .await
            .expect_err("menu item");
        assert_eq!(err.message(), "Menu item with ID 42 not found.");
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn update_with_null_items_is_bad_request() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .update_order(1, Sparse::Absent, Sparse::Null)
            .await
            .expect_err("null items");
        assert_eq!(err.message(), "items cannot be null");
    }

    #[tokio::test]
    async fn update_replaces_lines_only_when_items_present() {
        let now = chrono::Utc::now().fixed_offset();
        let stored = order::Model {
            id: 1,
            created_at: now,
            updated_at: now,
            customer_id: 2,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count(1), count(1)])
            .append_query_results([vec![stored.clone()], vec![order::Model {
                customer_id: 3,
                ..stored
            }]])
            .into_connection();

        service(&db)
            .update_order(1, Sparse::Present(3), Sparse::Absent)
            .await
            .expect("update");

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 4);
        assert!(
            log.iter()
                .all(|txn| !txn.statements()[0].sql.contains("order_items"))
        );
    }

    #[tokio::test]
    async fn delete_unknown_order_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count(0)])
            .into_connection();

        let err = service(&db).delete_order(3).await.expect_err("missing");
        assert_eq!(err.message(), "Order with ID 3 not found.");
    }

    #[tokio::test]
    async fn delete_existing_order_issues_two_deletes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count(1)])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        service(&db).delete_order(3).await.expect("delete");
    }
}
