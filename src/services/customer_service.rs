use sea_orm::Set;

use crate::{
    db::dao::{CustomerDao, OrderDao},
    db::entities::customer,
    error::AppError,
    services::crud_service::{CrudErrors, CrudOp, CrudService},
    services::validation::{null_not_allowed, validate_name},
    sparse::Sparse,
};

#[derive(Clone)]
pub struct CustomerService {
    customer_dao: CustomerDao,
    order_dao: OrderDao,
}

impl CustomerService {
    pub fn new(customer_dao: CustomerDao, order_dao: OrderDao) -> Self {
        Self {
            customer_dao,
            order_dao,
        }
    }

    pub async fn create_customer(&self, name: &str) -> Result<customer::Model, AppError> {
        let model = customer::ActiveModel {
            name: Set(validate_name("Name", name.to_string())?),
            ..Default::default()
        };

        let created = CrudService::create(self, model).await?;
        tracing::info!(customer_id = created.id, "customer created");
        Ok(created)
    }

    pub async fn list_customers(&self) -> Result<Vec<customer::Model>, AppError> {
        CrudService::list(self).await
    }

    pub async fn require_customer(&self, id: i32) -> Result<customer::Model, AppError> {
        CrudService::find_by_id(self, id).await
    }

    pub async fn update_customer(
        &self,
        id: i32,
        name: Sparse<String>,
    ) -> Result<customer::Model, AppError> {
        let name = name
            .required(null_not_allowed("name"))?
            .map(|name| validate_name("Name", name))
            .transpose()?;

        let updated = CrudService::update(self, id, move |active| {
            if let Some(name) = name {
                active.name = Set(name);
            }
        })
        .await?;
        tracing::info!(customer_id = id, "customer updated");
        Ok(updated)
    }

    /// Deletes the customer together with their orders and order lines,
    /// children first.
    pub async fn delete_customer(&self, id: i32) -> Result<(), AppError> {
        self.require_exists(id).await?;

        let orders = self
            .order_dao
            .delete_for_customer(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Delete, err))?;
        CrudService::delete(self, id).await?;

        tracing::info!(customer_id = id, orders, "customer deleted");
        Ok(())
    }
}

impl CrudService for CustomerService {
    type Dao = CustomerDao;

    fn dao(&self) -> &Self::Dao {
        &self.customer_dao
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            create_failed: "Customer create failed",
            find_failed: "Customer lookup failed",
            update_failed: "Customer update failed",
            delete_failed: "Customer delete failed",
        }
    }
}
