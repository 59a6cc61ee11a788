use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::menu_item,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, menu_item_service::MenuItemService},
    sparse::Sparse,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub price: f64,
    pub calories: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMenuItemRequest {
    #[serde(default)]
    pub name: Sparse<String>,
    #[serde(default)]
    pub price: Sparse<f64>,
    #[serde(default)]
    pub calories: Sparse<i32>,
}

#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub calories: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<menu_item::Model> for MenuItemResponse {
    fn from(model: menu_item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            calories: model.calories,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/menuitems", get(list_menu_items).post(create_menu_item))
        .route(
            "/menuitems/{id}",
            get(get_menu_item)
                .patch(update_menu_item)
                .delete(delete_menu_item),
        )
        .with_state(state)
}

fn menu_item_service(state: &AppState) -> MenuItemService {
    ServiceContext::from_state(state).menu_item()
}

async fn list_menu_items(State(state): State<Arc<AppState>>) -> ApiResult<Vec<MenuItemResponse>> {
    let items = menu_item_service(state.as_ref()).list_menu_items().await?;
    JsonApiResponse::ok(items.into_iter().map(MenuItemResponse::from).collect())
}

async fn get_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<MenuItemResponse> {
    let item = menu_item_service(state.as_ref()).require_menu_item(id).await?;
    JsonApiResponse::ok(item.into())
}

async fn create_menu_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateMenuItemRequest>,
) -> ApiResult<MenuItemResponse> {
    let item = menu_item_service(state.as_ref())
        .create_menu_item(&body.name, body.price, body.calories)
        .await?;
    JsonApiResponse::created(item.into())
}

async fn update_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateMenuItemRequest>,
) -> ApiResult<serde_json::Value> {
    let UpdateMenuItemRequest {
        name,
        price,
        calories,
    } = body;
    menu_item_service(state.as_ref())
        .update_menu_item(id, name, price, calories)
        .await?;
    JsonApiResponse::no_content("updated")
}

async fn delete_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    menu_item_service(state.as_ref()).delete_menu_item(id).await?;
    JsonApiResponse::no_content("deleted")
}
