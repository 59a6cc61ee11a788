use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::dao::{MenuItemSnapshot, NewOrderLine, OrderLineSummary, OrderSummary},
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        order_service::{OrderService, order_filter},
    },
    sparse::Sparse,
    state::AppState,
};

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderLineRequest {
    pub menu_item_id: i32,
    #[serde(default = "default_quantity", alias = "total_item_quantity")]
    pub quantity: i32,
}

impl From<OrderLineRequest> for NewOrderLine {
    fn from(line: OrderLineRequest) -> Self {
        Self {
            menu_item_id: line.menu_item_id,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    pub customer_id: i32,
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub customer_id: Sparse<i32>,
    #[serde(default)]
    pub items: Sparse<Vec<OrderLineRequest>>,
}

/// `from` and `to` are inclusive UTC days.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListOrdersQuery {
    pub customer_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct MenuItemSnapshotResponse {
    pub id: i32,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct OrderLineResponse {
    pub id: i32,
    pub quantity: i32,
    pub menu_item: MenuItemSnapshotResponse,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub customer_id: i32,
    pub customer: String,
    pub created_at: DateTimeWithTimeZone,
    pub items: Vec<OrderLineResponse>,
}

impl From<MenuItemSnapshot> for MenuItemSnapshotResponse {
    fn from(snapshot: MenuItemSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            price: snapshot.price,
        }
    }
}

impl From<OrderLineSummary> for OrderLineResponse {
    fn from(line: OrderLineSummary) -> Self {
        Self {
            id: line.id,
            quantity: line.quantity,
            menu_item: line.menu_item.into(),
        }
    }
}

impl From<OrderSummary> for OrderResponse {
    fn from(order: OrderSummary) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            customer: order.customer_name,
            created_at: order.created_at,
            items: order.items.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).patch(update_order).delete(delete_order),
        )
        .with_state(state)
}

fn order_service(state: &AppState) -> OrderService {
    ServiceContext::from_state(state).order()
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Vec<OrderResponse>> {
    let filter = order_filter(query.customer_id, query.from, query.to)?;
    let orders = order_service(state.as_ref()).list_orders(&filter).await?;
    JsonApiResponse::ok(orders.into_iter().map(OrderResponse::from).collect())
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<OrderResponse> {
    let order = order_service(state.as_ref()).require_order(id).await?;
    JsonApiResponse::ok(order.into())
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateOrderRequest>,
) -> ApiResult<OrderResponse> {
    let lines = body.items.into_iter().map(NewOrderLine::from).collect();
    let order = order_service(state.as_ref())
        .create_order(body.customer_id, lines)
        .await?;
    JsonApiResponse::created(order.into())
}

async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateOrderRequest>,
) -> ApiResult<serde_json::Value> {
    let items = match body.items {
        Sparse::Absent => Sparse::Absent,
        Sparse::Null => Sparse::Null,
        Sparse::Present(items) => {
            Sparse::Present(items.into_iter().map(NewOrderLine::from).collect())
        }
    };
    order_service(state.as_ref())
        .update_order(id, body.customer_id, items)
        .await?;
    JsonApiResponse::no_content("updated")
}

async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    order_service(state.as_ref()).delete_order(id).await?;
    JsonApiResponse::no_content("deleted")
}
