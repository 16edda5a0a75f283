//! Menu Item Model (menu / 菜单项)

use serde::{Deserialize, Serialize};

/// Menu item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum MenuCategory {
    Food,
    Drink,
}

/// Menu item entity
///
/// `price` is in currency minor units. Changing it never affects order
/// lines already written — those carry their own frozen `unit_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub vendor_id: i64,
    pub name: String,
    /// Base price in currency minor units
    pub price: i64,
    pub category: MenuCategory,
    pub photo: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: i64,
    pub category: MenuCategory,
    pub photo: Option<String>,
    pub description: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category: Option<MenuCategory>,
    pub photo: Option<String>,
    pub description: Option<String>,
}

/// Active discount summary attached to a priced menu projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountBrief {
    pub id: i64,
    pub name: String,
    pub percentage: f64,
}

/// Menu item with the best active discount applied (display projection)
///
/// `final_price` is computed with the same selector and rounding as
/// checkout pricing, so the displayed price never diverges from the
/// charged price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuPriced {
    pub id: i64,
    pub vendor_id: i64,
    pub name: String,
    pub category: MenuCategory,
    pub photo: Option<String>,
    pub description: Option<String>,
    /// Base price in currency minor units
    pub base_price: i64,
    /// Price after the best active discount (equal to base_price if none)
    pub final_price: i64,
    /// base_price - final_price
    pub savings: i64,
    pub discount_applied: Option<DiscountBrief>,
    pub has_discount: bool,
}
