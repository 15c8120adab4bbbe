//! 认证授权模块
//!
//! 提供 JWT 认证、声明式授权表和中间件：
//! - [`JwtService`] - JWT 令牌服务 (访问 + 刷新)
//! - [`CurrentUser`] - 当前用户上下文 (每次请求从数据库重新加载)
//! - [`require_auth`] - 认证中间件
//! - [`policy`] - 授权表: Action × Policy × Target

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use policy::{Action, Target, authorize, require_role};
