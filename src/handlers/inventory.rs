use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde_json::Value;
use tracing::info;

use super::common::{
    body_or_empty, created_response, number_or_zero, parse_record_id, present, text_of,
};
use crate::errors::ServiceError;
use crate::models::InventoryItem;
use crate::AppState;

/// Storeroom routes.
pub fn inventory_router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory).post(create_inventory_item))
        .route("/inventory/:id", get(get_inventory_item))
        .route("/inventory/:id/adjust", patch(adjust_inventory))
}

pub async fn list_inventory(State(state): State<AppState>) -> Json<Vec<InventoryItem>> {
    Json(state.inventory.list().await)
}

pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InventoryItem>, ServiceError> {
    let item = match parse_record_id(&id) {
        Some(item_id) => state.inventory.find(item_id).await,
        None => None,
    };
    item.map(Json)
        .ok_or_else(|| ServiceError::inventory_item_not_found(&id))
}

/// Adds a product. Body: `{ name, unit, quantity }`; quantity defaults to 0.
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Response, ServiceError> {
    let (Some(name), Some(unit)) = (present(&payload, "name"), present(&payload, "unit")) else {
        return Err(ServiceError::ValidationError(
            "Name and unit are required".to_string(),
        ));
    };

    let name = text_of(name);
    let unit = text_of(unit);
    let quantity = number_or_zero(payload.get("quantity"));

    let item = state
        .inventory
        .append_with(|id| InventoryItem::new(id, name, unit, quantity))
        .await;

    info!(
        item_id = item.id,
        name = %item.name,
        quantity = item.quantity,
        "Inventory item created"
    );
    Ok(created_response(item))
}

/// Stock movement. Body: `{ delta }`; a non-numeric delta counts as 0.
pub async fn adjust_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let payload = match body_or_empty(body) {
        Ok(payload) => payload,
        Err(rejection) => return Ok(rejection),
    };
    let delta = number_or_zero(payload.get("delta"));

    let item = match parse_record_id(&id) {
        Some(item_id) => state.inventory.adjust_quantity(item_id, delta).await,
        None => None,
    }
    .ok_or_else(|| ServiceError::inventory_item_not_found(&id))?;

    info!(
        item_id = item.id,
        delta,
        quantity = item.quantity,
        "Inventory quantity adjusted"
    );
    Ok(Json(item).into_response())
}
