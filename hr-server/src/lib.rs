//! HR Server - 人力资源管理后端
//!
//! # 架构概述
//!
//! 单体 HTTP 服务, 覆盖员工档案、请假、考勤、工资、绩效、培训与
//! 管理层报表:
//!
//! - **认证** (`auth`): JWT + Argon2, 声明式授权表
//! - **数据库** (`db`): 嵌入式 SQLite (sqlx), 仓储层按资源分文件
//! - **后台服务** (`services`): 任务队列、工资批次计算、对外回调
//! - **HTTP API** (`api`): RESTful 接口, 按资源分模块
//!
//! # 模块结构
//!
//! ```text
//! hr-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 认证、授权表、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 连接池、迁移、仓储
//! ├── services/      # 任务队列与 worker
//! └── utils/         # 日志、时间、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 固定 target, 方便在日志里按事件过滤
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __  ______
   / / / / __ \
  / /_/ / /_/ /
 / __  / _, _/
/_/ /_/_/ |_|
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}

/// 进程级初始化: dotenv + 日志。在读取任何配置之前调用。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_json = std::env::var("LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(&log_level, log_json, log_dir.as_deref())?;

    Ok(())
}
