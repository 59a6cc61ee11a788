use sea_orm::DatabaseConnection;

use super::DaoBase;
use crate::db::entities::prelude::Customer;

#[derive(Clone)]
pub struct CustomerDao {
    db: DatabaseConnection,
}

impl DaoBase for CustomerDao {
    type Entity = Customer;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
