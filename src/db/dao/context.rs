use sea_orm::DatabaseConnection;

use super::{CustomerDao, DaoBase, MenuItemDao, OrderDao, ReportDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn menu_item(&self) -> MenuItemDao {
        DaoBase::new(&self.db)
    }

    pub fn customer(&self) -> CustomerDao {
        DaoBase::new(&self.db)
    }

    pub fn order(&self) -> OrderDao {
        DaoBase::new(&self.db)
    }

    pub fn report(&self) -> ReportDao {
        ReportDao::new(&self.db)
    }
}
