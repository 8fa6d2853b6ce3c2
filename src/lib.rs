//! Ristoword backend library
//!
//! Restaurant order and inventory tracking: two persisted collections (orders, stock
//! items) kept in memory, mirrored to JSON files on every write, and served over HTTP.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod models;
pub mod repositories;
pub mod tracing;

use std::sync::Arc;

use axum::Router;
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::repositories::{
    inventory_repository::open_inventory, order_repository::open_orders, InventoryRepository,
    OrderRepository,
};

/// Shared state handed to every handler. Both repositories are constructed once by the
/// caller and injected here.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub orders: Arc<OrderRepository>,
    pub inventory: Arc<InventoryRepository>,
}

impl AppState {
    pub fn new(config: AppConfig, orders: OrderRepository, inventory: InventoryRepository) -> Self {
        Self {
            config: Arc::new(config),
            orders: Arc::new(orders),
            inventory: Arc::new(inventory),
        }
    }

    /// Opens the JSON file repositories under the configured data directory.
    pub fn open(config: AppConfig) -> Self {
        let data_dir = config.data_dir();
        let orders = open_orders(&data_dir);
        let inventory = open_inventory(&data_dir);
        Self::new(config, orders, inventory)
    }
}

/// CORS from configuration: explicit origins when set, otherwise permissive.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Full HTTP surface: health, pages, orders and inventory.
pub fn app_router(state: AppState) -> Router {
    let public_dir = state.config.public_dir();

    Router::new()
        .merge(handlers::health_router())
        .merge(handlers::orders_router())
        .merge(handlers::inventory_router())
        .merge(handlers::pages_router(&public_dir))
        .layer(crate::tracing::configure_http_tracing())
        .layer(cors_layer(&state.config))
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
