//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`vendors`] - 档口管理接口
//! - [`menus`] - 菜单管理接口 (公开列表含折扣价)
//! - [`discounts`] - 折扣管理接口
//! - [`students`] - 学生管理接口
//! - [`orders`] - 学生订单接口 (下单/查询/小票)
//! - [`vendor_orders`] - 档口订单接口 (状态流转/营收汇总)

pub mod auth;
pub mod health;

pub mod discounts;
pub mod menus;
pub mod orders;
pub mod students;
pub mod vendor_orders;
pub mod vendors;

use axum::Router;

use crate::core::ServerState;

/// Combined application router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(vendors::router())
        .merge(menus::router())
        .merge(discounts::router())
        .merge(students::router())
        .merge(orders::router())
        .merge(vendor_orders::router())
}
