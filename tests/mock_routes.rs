use std::collections::BTreeMap;

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use sea_orm::{MockDatabase, Value};
use serde_json::json;
use tower::ServiceExt;

use restaurant_api::{
    db::entities::{customer, menu_item},
    test_helpers::{empty_mock, mock_app},
};

async fn json_response(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("request should succeed");
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    if body.is_empty() {
        return (status, serde_json::Value::Null);
    }
    let json = serde_json::from_slice(&body).expect("body should be json");
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn with_json(method: &str, uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn count(value: i64) -> Vec<BTreeMap<&'static str, Value>> {
    vec![BTreeMap::from([("num_items", Value::from(value))])]
}

fn menu_item(id: i32, name: &str, price: f64, calories: i32) -> menu_item::Model {
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

fn customer(id: i32, name: &str) -> customer::Model {
    let now = chrono::Utc::now().fixed_offset();
    customer::Model {
        id,
        created_at: now,
        updated_at: now,
        name: name.to_string(),
    }
}

#[tokio::test]
async fn health_reports_backend() {
    let (status, body) = json_response(mock_app(empty_mock()), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ok"], true);
    assert_eq!(body["data"]["database"], "postgres");
}

#[tokio::test]
async fn unknown_route_is_wrapped_in_envelope() {
    let (status, body) = json_response(mock_app(empty_mock()), get("/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn create_menu_item_returns_created_envelope() {
    let mock = empty_mock().append_query_results([vec![menu_item(1, "Waffles", 5.25, 380)]]);

    let (status, body) = json_response(
        mock_app(mock),
        with_json(
            "POST",
            "/menuitems",
            json!({ "name": "Waffles", "price": 5.25, "calories": 380 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "created");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "Waffles");
    assert_eq!(body["data"]["price"], 5.25);
}

#[tokio::test]
async fn create_menu_item_with_unknown_field_is_rejected() {
    let (status, body) = json_response(
        mock_app(empty_mock()),
        with_json(
            "POST",
            "/menuitems",
            json!({ "name": "Soup", "price": 1.0, "calories": 10, "spicy": true }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn create_without_content_type_is_unsupported_media_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/customers")
        .body(Body::from(r#"{"name":"Alice"}"#))
        .expect("request");

    let (status, body) = json_response(mock_app(empty_mock()), request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["status"], 415);
}

#[tokio::test]
async fn get_missing_menu_item_is_not_found() {
    let mock = empty_mock().append_query_results([Vec::<menu_item::Model>::new()]);

    let (status, body) = json_response(mock_app(mock), get("/menuitems/7")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Menu item with ID 7 not found.");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let (status, body) = json_response(mock_app(empty_mock()), get("/customers/abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn patch_customer_on_singular_path_returns_no_content() {
    let stored = customer(3, "Alice");
    let renamed = customer::Model {
        name: "Alicia".to_string(),
        ..stored.clone()
    };
    let mock = empty_mock().append_query_results([vec![stored], vec![renamed]]);

    let (status, body) = json_response(
        mock_app(mock),
        with_json("PATCH", "/customer/3", json!({ "name": "Alicia" })),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
}

#[tokio::test]
async fn patch_unknown_ids_are_not_found() {
    let mock = empty_mock().append_query_results([Vec::<customer::Model>::new()]);
    let (status, body) = json_response(
        mock_app(mock),
        with_json("PATCH", "/customer/41", json!({ "name": "Zed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer with ID 41 not found.");

    let mock = empty_mock().append_query_results([Vec::<menu_item::Model>::new()]);
    let (status, body) = json_response(
        mock_app(mock),
        with_json("PATCH", "/menuitems/42", json!({ "calories": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Menu item with ID 42 not found.");
}

#[tokio::test]
async fn patch_with_null_name_is_bad_request() {
    let (status, body) = json_response(
        mock_app(empty_mock()),
        with_json("PATCH", "/customers/3", json!({ "name": null })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name cannot be null");
}

#[tokio::test]
async fn deleting_referenced_menu_item_is_conflict() {
    let mock: MockDatabase = empty_mock().append_query_results([count(1), count(3)]);

    let request = Request::builder()
        .method("DELETE")
        .uri("/menuitems/4")
        .body(Body::empty())
        .expect("request");
    let (status, body) = json_response(mock_app(mock), request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn reversed_date_range_is_bad_request() {
    let (status, body) = json_response(
        mock_app(empty_mock()),
        get("/orders?from=2024-02-01&to=2024-01-01"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "`from` must not be after `to`");
}

#[tokio::test]
async fn orders_are_nested_with_menu_item_snapshots() {
    let created_at = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00")
        .expect("timestamp");
    let row = |line_id: i32, menu_item_id: i32, name: &str, price: f64| {
        BTreeMap::from([
            ("order_id", Value::from(1)),
            ("customer_id", Value::from(1)),
            ("customer_name", Value::from("Alice")),
            ("created_at", Value::from(created_at)),
            ("line_id", Value::from(Some(line_id))),
            ("quantity", Value::from(Some(2))),
            ("menu_item_id", Value::from(Some(menu_item_id))),
            ("menu_item_name", Value::from(Some(name.to_string()))),
            ("price", Value::from(Some(price))),
        ])
    };
    let mock = empty_mock().append_query_results([vec![
        row(1, 10, "Burger", 8.5),
        row(2, 11, "Fries", 3.0),
    ]]);

    let (status, body) = json_response(mock_app(mock), get("/orders")).await;

    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().expect("array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customer"], "Alice");
    assert_eq!(orders[0]["items"][0]["menu_item"]["name"], "Burger");
    assert_eq!(orders[0]["items"][1]["menu_item"]["price"], 3.0);
}

#[tokio::test]
async fn customer_report_requires_customer_id() {
    let (status, body) = json_response(
        mock_app(empty_mock()),
        get("/reports/customer-orders"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}
