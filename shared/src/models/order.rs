//! Order Model (transaksi / 订单)

use serde::{Deserialize, Serialize};

use super::menu::MenuCategory;

/// Order status pipeline
///
/// Normal flow: unconfirmed → cooking → delivering → arrived.
/// Which transitions are actually accepted is decided by the server's
/// configured status policy, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Unconfirmed,
    Cooking,
    Delivering,
    Arrived,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unconfirmed => "unconfirmed",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Arrived => "arrived",
        }
    }

    /// Position in the pipeline (0-based), used by forward-only policies
    pub fn step(&self) -> u8 {
        match self {
            OrderStatus::Unconfirmed => 0,
            OrderStatus::Cooking => 1,
            OrderStatus::Delivering => 2,
            OrderStatus::Arrived => 3,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity
///
/// Only `status` mutates after creation; the lines are frozen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub vendor_id: i64,
    pub student_id: i64,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// Order line entity
///
/// `unit_price` is the purchase price resolved at order-creation time.
/// It is written exactly once and never recomputed, so later discount or
/// menu-price changes cannot alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub menu_id: i64,
    pub qty: i64,
    /// Frozen purchase price per unit, in currency minor units
    pub unit_price: i64,
}

// =============================================================================
// Request payloads
// =============================================================================

/// One requested line of a checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub menu_id: i64,
    pub qty: i64,
    /// Explicit discount choice; when absent the best active assigned
    /// discount is applied automatically
    pub discount_id: Option<i64>,
}

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub vendor_id: i64,
    pub lines: Vec<OrderLineRequest>,
}

/// Status update payload (vendor side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// A priced line ready to be persisted (output of the price resolver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineNew {
    pub menu_id: i64,
    pub qty: i64,
    pub unit_price: i64,
}

// =============================================================================
// Response projections
// =============================================================================

/// Order line enriched with menu info (detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLineDetail {
    pub menu_id: i64,
    pub menu_name: String,
    pub category: MenuCategory,
    pub qty: i64,
    pub unit_price: i64,
    /// unit_price * qty
    pub subtotal: i64,
}

/// Full order view with computed total
///
/// `total_price` is derived from the frozen line prices on every read;
/// it is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub vendor_id: i64,
    pub vendor_name: String,
    pub student_id: i64,
    pub student_name: String,
    pub status: OrderStatus,
    pub created_at: i64,
    pub lines: Vec<OrderLineDetail>,
    pub total_price: i64,
}

/// Receipt projection (JSON, rendered client-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub order_id: i64,
    pub created_at: i64,
    pub status: OrderStatus,
    pub vendor_name: String,
    pub vendor_owner: String,
    pub vendor_phone: Option<String>,
    pub buyer_name: String,
    pub buyer_address: String,
    pub buyer_phone: String,
    pub items: Vec<OrderLineDetail>,
    pub total_price: i64,
}

/// Monthly order history (student side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyHistory {
    pub month: u32,
    pub year: i32,
    pub order_count: usize,
    /// Sum of order totals across the month
    pub total_spent: i64,
    pub orders: Vec<OrderDetail>,
}

/// Monthly income recap (vendor side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRecap {
    pub month: u32,
    pub year: i32,
    pub vendor_name: String,
    pub total_orders: usize,
    pub total_income: i64,
    pub unconfirmed: usize,
    pub cooking: usize,
    pub delivering: usize,
    pub arrived: usize,
}
