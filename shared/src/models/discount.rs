//! Discount Model (diskon / 折扣)

use serde::{Deserialize, Serialize};

/// Discount entity — a time-bounded percentage reduction
///
/// A discount on its own has no effect; it applies to a menu item only
/// through a [`MenuDiscount`] assignment row. The validity window is
/// inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Discount {
    pub id: i64,
    pub name: String,
    /// Percentage off, 0–100 inclusive (30.0 = 30% off)
    pub percentage: f64,
    /// Window start (milliseconds since epoch, inclusive)
    pub starts_at: i64,
    /// Window end (milliseconds since epoch, inclusive)
    pub ends_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Discount {
    /// Whether `now` falls inside the validity window (boundary inclusive)
    pub fn is_active_at(&self, now: i64) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }
}

/// Menu-discount assignment — sole authority for applicability
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuDiscount {
    pub menu_id: i64,
    pub discount_id: i64,
}

/// Create discount payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCreate {
    pub name: String,
    pub percentage: f64,
    pub starts_at: i64,
    pub ends_at: i64,
}

/// Create discount and assign it to menus in one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountPerMenuCreate {
    pub name: String,
    pub percentage: f64,
    pub starts_at: i64,
    pub ends_at: i64,
    pub menu_ids: Vec<i64>,
}

/// Update discount payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountUpdate {
    pub name: Option<String>,
    pub percentage: Option<f64>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
}

/// Assignment payload (assign/remove a discount to/from menus)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountAssign {
    pub menu_ids: Vec<i64>,
}

/// Discount with its assigned menu items (admin list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountWithMenus {
    #[serde(flatten)]
    pub discount: Discount,
    pub menus: Vec<super::menu::MenuItem>,
}
