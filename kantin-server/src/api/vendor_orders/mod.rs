//! Vendor Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/vendor/orders", vendor_order_routes())
}

fn vendor_order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/recap/monthly", get(handler::monthly_recap))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
}
