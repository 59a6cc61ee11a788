use sea_orm::{Set, SqlErr};

use crate::{
    db::dao::{DaoBase, DaoLayerError, MenuItemChanges, MenuItemDao},
    db::entities::menu_item,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
    services::validation::{null_not_allowed, validate_calories, validate_name, validate_price},
    sparse::Sparse,
};

#[derive(Clone)]
pub struct MenuItemService {
    menu_item_dao: MenuItemDao,
}

impl MenuItemService {
    pub fn new(menu_item_dao: MenuItemDao) -> Self {
        Self { menu_item_dao }
    }

    pub async fn create_menu_item(
        &self,
        name: &str,
        price: f64,
        calories: i32,
    ) -> Result<menu_item::Model, AppError> {
        let model = menu_item::ActiveModel {
            name: Set(validate_name("Name", name.to_string())?),
            price: Set(validate_price(price)?),
            calories: Set(validate_calories(calories)?),
            ..Default::default()
        };

        let created = CrudService::create(self, model).await?;
        tracing::info!(menu_item_id = created.id, "menu item created");
        Ok(created)
    }

    pub async fn list_menu_items(&self) -> Result<Vec<menu_item::Model>, AppError> {
        CrudService::list(self).await
    }

    pub async fn require_menu_item(&self, id: i32) -> Result<menu_item::Model, AppError> {
        CrudService::find_by_id(self, id).await
    }

    /// Applies the present fields; absent ones keep their stored value.
    pub async fn update_menu_item(
        &self,
        id: i32,
        name: Sparse<String>,
        price: Sparse<f64>,
        calories: Sparse<i32>,
    ) -> Result<menu_item::Model, AppError> {
        let changes = MenuItemChanges {
            name: name
                .required(null_not_allowed("name"))?
                .map(|name| validate_name("Name", name))
                .transpose()?,
            price: price
                .required(null_not_allowed("price"))?
                .map(validate_price)
                .transpose()?,
            calories: calories
                .required(null_not_allowed("calories"))?
                .map(validate_calories)
                .transpose()?,
        };

        let updated = self
            .menu_item_dao
            .update_menu_item(id, changes)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))?;
        tracing::info!(menu_item_id = id, "menu item updated");
        Ok(updated)
    }

    /// Refuses to delete a menu item that order lines still reference.
    pub async fn delete_menu_item(&self, id: i32) -> Result<(), AppError> {
        self.require_exists(id).await?;

        let lines = self
            .menu_item_dao
            .count_order_lines(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        if lines > 0 {
            return Err(AppError::conflict(format!(
                "Menu item with ID {id} is referenced by {lines} order line(s) and cannot be deleted."
            )));
        }

        // a line inserted after the count still trips the foreign key
        self.menu_item_dao
            .delete(id)
            .await
            .map_err(|err| self.delete_failed(id, err))?;
        tracing::info!(menu_item_id = id, "menu item deleted");
        Ok(())
    }

    fn delete_failed(&self, id: i32, err: DaoLayerError) -> AppError {
        if let DaoLayerError::Db(db_err) = &err {
            if let Some(SqlErr::ForeignKeyConstraintViolation(_)) = db_err.sql_err() {
                return AppError::conflict(format!(
                    "Menu item with ID {id} is referenced by order lines and cannot be deleted."
                ));
            }
        }
        self.map_error(CrudOp::Delete, err)
    }
}

impl CrudService for MenuItemService {
    type Dao = MenuItemDao;

    fn dao(&self) -> &Self::Dao {
        &self.menu_item_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Menu item create failed",
            find_failed: "Menu item lookup failed",
            update_failed: "Menu item update failed",
            delete_failed: "Menu item delete failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use axum::http::StatusCode;
    use sea_orm::{
        DatabaseBackend, DatabaseConnection, DbErr, IntoMockRow, MockDatabase, MockExecResult,
        Value,
    };

    use super::*;
    use crate::{
        config::DatabaseConfig,
        db::{
            connection,
            dao::{CustomerDao, NewOrderLine, OrderDao},
            entities::customer,
        },
    };

    struct MenuItemFixture {
        mock: MockDatabase,
    }

    impl MenuItemFixture {
        fn new() -> Self {
            Self {
                mock: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }

        fn with_query_results<T, I, II>(mut self, sets: II) -> Self
        where
            T: IntoMockRow,
            I: IntoIterator<Item = T>,
            II: IntoIterator<Item = I>,
        {
            self.mock = self.mock.append_query_results(sets);
            self
        }

        fn with_count(self, count: i64) -> Self {
            self.with_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::from(count),
            )])]])
        }

        fn with_query_error(mut self, error: DbErr) -> Self {
            self.mock = self.mock.append_query_errors([error]);
            self
        }

        fn with_exec_result(mut self, rows_affected: u64) -> Self {
            self.mock = self.mock.append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected,
            }]);
            self
        }

        fn build(self) -> (MenuItemService, DatabaseConnection) {
            let db = self.mock.into_connection();
            (MenuItemService::new(MenuItemDao::new(&db)), db)
        }
    }

    fn model(id: i32, name: &str, price: f64, calories: i32) -> menu_item::Model {
        let now = chrono::Utc::now().fixed_offset();
        menu_item::Model {
            id,
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            price,
            calories,
        }
    }

    #[tokio::test]
    async fn create_stores_name_exactly_as_sent() {
        let (service, db) = MenuItemFixture::new()
            .with_query_results([vec![model(1, "  Pancakes ", 6.5, 420)]])
            .build();

        let created = service
            .create_menu_item("  Pancakes ", 6.5, 420)
            .await
            .expect("create");
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "  Pancakes ");
        assert_eq!(created.calories, 420);

        let log = db.into_transaction_log();
        let insert = &log[0].statements()[0];
        assert!(insert.sql.starts_with("INSERT"), "{}", insert.sql);
        assert!(
            format!("{:?}", insert.values).contains("\"  Pancakes \""),
            "{:?}",
            insert.values
        );
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload_before_touching_storage() {
        let (service, db) = MenuItemFixture::new().build();

        let err = service
            .create_menu_item("Soup", -1.0, 100)
            .await
            .expect_err("negative price");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = service
            .create_menu_item(" ", 1.0, 100)
            .await
            .expect_err("blank name");
        assert_eq!(err.message(), "Name required");

        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn find_missing_names_entity_and_id() {
        let (service, _db) = MenuItemFixture::new()
            .with_query_results([Vec::<menu_item::Model>::new()])
            .build();

        let err = service.require_menu_item(7).await.expect_err("missing");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Menu item with ID 7 not found.");
    }

    #[tokio::test]
    async fn storage_failure_maps_to_internal_with_context() {
        let (service, _db) = MenuItemFixture::new()
            .with_query_error(DbErr::Custom("connection reset".to_string()))
            .build();

        let err = service.list_menu_items().await.expect_err("db failure");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.message(),
            "Menu item lookup failed. Please check the logs for more details"
        );
        assert!(err.source_error().is_some());
    }

    #[tokio::test]
    async fn update_with_null_name_is_bad_request() {
        let (service, db) = MenuItemFixture::new().build();

        let err = service
            .update_menu_item(1, Sparse::Null, Sparse::Absent, Sparse::Absent)
            .await
            .expect_err("null name");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "name cannot be null");
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let stored = model(1, "A", 1.0, 10);
        let (service, _db) = MenuItemFixture::new()
            .with_query_results([vec![stored.clone()]])
            .with_query_results([vec![menu_item::Model {
                name: "B".to_string(),
                ..stored
            }]])
            .build();

        let updated = service
            .update_menu_item(
                1,
                Sparse::Present("B".to_string()),
                Sparse::Absent,
                Sparse::Absent,
            )
            .await
            .expect("update");
        assert_eq!(updated.name, "B");
        assert_eq!(updated.price, 1.0);
    }

    #[tokio::test]
    async fn update_unknown_menu_item_is_not_found() {
        let (service, _db) = MenuItemFixture::new()
            .with_query_results([Vec::<menu_item::Model>::new()])
            .build();

        let err = service
            .update_menu_item(
                12,
                Sparse::Present("Tea".to_string()),
                Sparse::Absent,
                Sparse::Absent,
            )
            .await
            .expect_err("missing");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Menu item with ID 12 not found.");
    }

    #[tokio::test]
    async fn delete_referenced_menu_item_is_conflict() {
        let (service, db) = MenuItemFixture::new()
            .with_count(1)
            .with_count(2)
            .build();

        let err = service.delete_menu_item(4).await.expect_err("referenced");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.message().contains("Menu item with ID 4"));

        // two counts and no DELETE
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
    }

    #[tokio::test]
    async fn delete_unreferenced_menu_item_succeeds() {
        let (service, _db) = MenuItemFixture::new()
            .with_count(1)
            .with_count(0)
            .with_exec_result(1)
            .build();

        service.delete_menu_item(4).await.expect("delete");
    }

    #[tokio::test]
    async fn delete_unknown_menu_item_is_not_found() {
        let (service, _db) = MenuItemFixture::new().with_count(0).build();

        let err = service.delete_menu_item(4).await.expect_err("missing");
        assert_eq!(err.message(), "Menu item with ID 4 not found.");
    }

    #[tokio::test]
    async fn foreign_key_violation_on_delete_is_conflict() {
        let db = connection::connect(&DatabaseConfig::in_memory_sqlite())
            .await
            .expect("sqlite");
        let menu_items = MenuItemDao::new(&db);
        let item = menu_items
            .create(menu_item::ActiveModel {
                name: Set("Tea".to_string()),
                price: Set(2.0),
                calories: Set(0),
                ..Default::default()
            })
            .await
            .expect("menu item");
        let customer = CustomerDao::new(&db)
            .create(customer::ActiveModel {
                name: Set("Alice".to_string()),
                ..Default::default()
            })
            .await
            .expect("customer");
        OrderDao::new(&db)
            .create_order(
                customer.id,
                &[NewOrderLine {
                    menu_item_id: item.id,
                    quantity: 1,
                }],
            )
            .await
            .expect("order");

        // skips the line count, as a concurrent insert would
        let err = menu_items.delete(item.id).await.expect_err("referenced");
        let service = MenuItemService::new(menu_items);
        let err = service.delete_failed(item.id, err);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(
            err.message(),
            format!(
                "Menu item with ID {} is referenced by order lines and cannot be deleted.",
                item.id
            )
        );
    }
}
