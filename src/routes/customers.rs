use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::customer,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, customer_service::CustomerService},
    sparse::Sparse,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCustomerRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub name: Sparse<String>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<customer::Model> for CustomerResponse {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        // singular path kept for existing clients
        .route("/customer/{id}", patch(update_customer))
        .with_state(state)
}

fn customer_service(state: &AppState) -> CustomerService {
    ServiceContext::from_state(state).customer()
}

async fn list_customers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CustomerResponse>> {
    let customers = customer_service(state.as_ref()).list_customers().await?;
    JsonApiResponse::ok(customers.into_iter().map(CustomerResponse::from).collect())
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<CustomerResponse> {
    let customer = customer_service(state.as_ref()).require_customer(id).await?;
    JsonApiResponse::ok(customer.into())
}

async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCustomerRequest>,
) -> ApiResult<CustomerResponse> {
    let customer = customer_service(state.as_ref())
        .create_customer(&body.name)
        .await?;
    JsonApiResponse::created(customer.into())
}

async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCustomerRequest>,
) -> ApiResult<serde_json::Value> {
    customer_service(state.as_ref())
        .update_customer(id, body.name)
        .await?;
    JsonApiResponse::no_content("updated")
}

async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    customer_service(state.as_ref()).delete_customer(id).await?;
    JsonApiResponse::no_content("deleted")
}
