//! Student Model (siswa / 学生)

use serde::{Deserialize, Serialize};

/// Student profile entity
///
/// Linked 1:1 to a `student`-role account via `user_id` (unique). A
/// profile may be auto-provisioned on first checkout with blank contact
/// fields; the unique constraint is what keeps concurrent first
/// checkouts from creating duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub photo: String,
    pub user_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create student payload (admin creates profile + login account)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCreate {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub photo: Option<String>,
    pub username: String,
    pub password: String,
}

/// Update student payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
}
