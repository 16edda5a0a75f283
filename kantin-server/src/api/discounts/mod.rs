//! Discount API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/discounts", discount_routes())
}

fn discount_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/per-menu", post(handler::create_per_menu))
        .route("/active", get(handler::list_active))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/assign", post(handler::assign))
        .route("/{id}/remove", post(handler::remove))
}
