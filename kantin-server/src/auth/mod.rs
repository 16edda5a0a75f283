//! 认证模块
//!
//! JWT 认证体系：
//! - [`JwtService`] - 令牌生成与验证
//! - [`CurrentUser`] - 请求上下文中的已认证用户 (axum extractor)

mod extractor;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use password::{hash_password, verify_password};
