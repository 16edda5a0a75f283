//! Student Order API 模块

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_mine).post(handler::create))
        .route("/history", get(handler::history))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/receipt", get(handler::receipt))
}
