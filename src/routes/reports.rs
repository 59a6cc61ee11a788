use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    db::dao::{CustomerQuantity, DailyRevenue, MenuItemSales},
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, order_service::order_filter, report_service::ReportService},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerOrdersQuery {
    pub customer_id: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyRevenueQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct BestSellingItemResponse {
    pub menu_item_id: i32,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct CustomerOrdersResponse {
    pub customer_id: i32,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct DailyRevenueResponse {
    pub date: NaiveDate,
    pub revenue: f64,
}

impl From<MenuItemSales> for BestSellingItemResponse {
    fn from(sales: MenuItemSales) -> Self {
        Self {
            menu_item_id: sales.menu_item_id,
            name: sales.name,
            quantity: sales.quantity,
        }
    }
}

impl From<CustomerQuantity> for CustomerOrdersResponse {
    fn from(report: CustomerQuantity) -> Self {
        Self {
            customer_id: report.customer_id,
            name: report.name,
            quantity: report.quantity,
        }
    }
}

impl From<DailyRevenue> for DailyRevenueResponse {
    fn from(day: DailyRevenue) -> Self {
        Self {
            date: day.date,
            revenue: day.revenue,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/reports/best-selling", get(best_selling))
        .route("/reports/customer-orders", get(customer_orders))
        .route("/reports/daily-revenue", get(daily_revenue))
        .with_state(state)
}

fn report_service(state: &AppState) -> ReportService {
    ServiceContext::from_state(state).report()
}

async fn best_selling(State(state): State<Arc<AppState>>) -> ApiResult<BestSellingItemResponse> {
    let best = report_service(state.as_ref())
        .best_selling_menu_item()
        .await?;
    JsonApiResponse::ok(best.into())
}

async fn customer_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CustomerOrdersQuery>,
) -> ApiResult<CustomerOrdersResponse> {
    let report = report_service(state.as_ref())
        .customer_order_quantity(query.customer_id)
        .await?;
    JsonApiResponse::ok(report.into())
}

async fn daily_revenue(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DailyRevenueQuery>,
) -> ApiResult<Vec<DailyRevenueResponse>> {
    let filter = order_filter(None, query.from, query.to)?;
    let days = report_service(state.as_ref())
        .daily_revenue(&filter)
        .await?;
    JsonApiResponse::ok(days.into_iter().map(DailyRevenueResponse::from).collect())
}
