//! Kantin Server - 校园食堂订餐后端
//!
//! # 架构概述
//!
//! 本模块是订餐服务的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx)
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **定价** (`pricing`): 折扣解析与订单行定价引擎
//! - **订单** (`orders`): 订单聚合与状态流转
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! kantin-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码哈希
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (连接池、仓储)
//! ├── pricing/       # 折扣定价引擎
//! ├── orders/        # 订单聚合、状态策略
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod pricing;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::StatusPolicy;
pub use pricing::{PricingCatalog, PricingError};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   __ __           __  _
  / //_/___ ____  / /_(_)___
 / ,<  / __ `/ _ \/ __/ / __ \
/ /| |/ /_/ /  __/ /_/ / / / /
\_/ |_\__,_/\___/\__/_/_/ /_/
    "#
    );
}
