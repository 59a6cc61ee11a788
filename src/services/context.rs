use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    services::{
        customer_service::CustomerService, menu_item_service::MenuItemService,
        order_service::OrderService, report_service::ReportService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn menu_item(&self) -> MenuItemService {
        MenuItemService::new(self.daos.menu_item())
    }

    pub fn customer(&self) -> CustomerService {
        CustomerService::new(self.daos.customer(), self.daos.order())
    }

    pub fn order(&self) -> OrderService {
        OrderService::new(self.daos.order(), self.daos.customer(), self.daos.menu_item())
    }

    pub fn report(&self) -> ReportService {
        ReportService::new(self.daos.report())
    }
}
