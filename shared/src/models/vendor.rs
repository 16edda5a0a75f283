//! Vendor Model (stan / 档口)

use serde::{Deserialize, Serialize};

/// Vendor entity — one food stall, owned by one vendor-admin account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub owner_name: String,
    pub phone: Option<String>,
    /// Owning account (unique — one vendor per admin)
    pub user_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create vendor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorCreate {
    pub name: String,
    pub owner_name: String,
    pub phone: Option<String>,
}

/// Update vendor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorUpdate {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub phone: Option<String>,
}
