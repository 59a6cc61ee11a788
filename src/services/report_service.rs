use crate::{
    db::dao::{
        BaseEntity, CustomerQuantity, DailyRevenue, DaoLayerError, MenuItemSales, OrderFilter,
        ReportDao,
    },
    db::entities::prelude::Customer,
    error::AppError,
};

#[derive(Clone)]
pub struct ReportService {
    report_dao: ReportDao,
}

impl ReportService {
    pub fn new(report_dao: ReportDao) -> Self {
        Self { report_dao }
    }

    pub async fn best_selling_menu_item(&self) -> Result<MenuItemSales, AppError> {
        self.report_dao
            .best_seller()
            .await
            .map_err(report_failed)?
            .ok_or_else(|| AppError::not_found("No menu item has been ordered yet."))
    }

    pub async fn customer_order_quantity(
        &self,
        customer_id: i32,
    ) -> Result<CustomerQuantity, AppError> {
        self.report_dao
            .customer_quantity(customer_id)
            .await
            .map_err(report_failed)?
            .ok_or_else(|| AppError::entity_not_found(Customer::LABEL, customer_id))
    }

    pub async fn daily_revenue(
        &self,
        filter: &OrderFilter,
    ) -> Result<Vec<DailyRevenue>, AppError> {
        self.report_dao
            .daily_revenue(filter)
            .await
            .map_err(report_failed)
    }
}

fn report_failed(err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::Db(db_err) => AppError::internal_with_source(
            "Report failed. Please check the logs for more details",
            db_err,
        ),
        other => other.into(),
    }
}
