use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value;
use tracing::info;

use super::common::{
    body_or_empty, created_response, is_truthy, number_or_zero, parse_record_id, present, text_of,
};
use crate::errors::ServiceError;
use crate::models::{Order, TableRef};
use crate::AppState;

/// Order routes used by the dining room, kitchen and cash desk.
pub fn orders_router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", patch(update_order_status))
        .route("/orders/:id/paid", patch(update_order_paid))
}

/// Opens an order for a table.
///
/// Body: `{ table, covers, area, waiter }`. `table`, `covers` and `waiter` are required;
/// `covers` is coerced to a number (fractions kept), `area` is optional and free-form.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Response, ServiceError> {
    let (Some(table), Some(covers), Some(waiter)) = (
        present(&payload, "table"),
        present(&payload, "covers"),
        present(&payload, "waiter"),
    ) else {
        return Err(ServiceError::ValidationError(
            "Missing order data: table, covers and waiter are required".to_string(),
        ));
    };

    let table = TableRef::from_json(table);
    let covers = number_or_zero(Some(covers));
    let waiter = text_of(waiter);
    let area = payload
        .get("area")
        .filter(|area| !area.is_null())
        .map(text_of);

    let order = state
        .orders
        .append_with(|id| Order::new(id, table, covers, area, waiter))
        .await;

    info!(
        order_id = order.id,
        table = %order.table,
        covers = order.covers,
        waiter = %order.waiter,
        "Order created"
    );
    Ok(created_response(order))
}

pub async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.orders.list().await)
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ServiceError> {
    let order = match parse_record_id(&id) {
        Some(order_id) => state.orders.find(order_id).await,
        None => None,
    };
    order.map(Json).ok_or_else(|| ServiceError::order_not_found(&id))
}

/// Kitchen status change. Body: `{ status }`; an absent or `null` status clears it.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let payload = match body_or_empty(body) {
        Ok(payload) => payload,
        Err(rejection) => return Ok(rejection),
    };
    let status = payload
        .get("status")
        .filter(|status| !status.is_null())
        .map(text_of);

    let order = match parse_record_id(&id) {
        Some(order_id) => state.orders.set_status(order_id, status).await,
        None => None,
    }
    .ok_or_else(|| ServiceError::order_not_found(&id))?;

    info!(order_id = order.id, status = ?order.status, "Order status updated");
    Ok(Json(order).into_response())
}

/// Cash desk payment toggle. Body: `{ paid }`, coerced to a boolean.
pub async fn update_order_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let payload = match body_or_empty(body) {
        Ok(payload) => payload,
        Err(rejection) => return Ok(rejection),
    };
    let paid = is_truthy(payload.get("paid"));

    let order = match parse_record_id(&id) {
        Some(order_id) => state.orders.set_paid(order_id, paid).await,
        None => None,
    }
    .ok_or_else(|| ServiceError::order_not_found(&id))?;

    info!(order_id = order.id, paid = order.paid, "Order payment updated");
    Ok(Json(order).into_response())
}
