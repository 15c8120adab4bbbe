//! JWT 令牌服务
//!
//! 处理访问/刷新令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::models::{User, UserRole};
use thiserror::Error;

/// Access token marker (claims `token_type`)
pub const TOKEN_TYPE_ACCESS: &str = "access";
/// Refresh token marker (claims `token_type`)
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 访问令牌过期时间 (分钟)
    pub access_expire_minutes: i64,
    /// 刷新令牌过期时间 (天)
    pub refresh_expire_days: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(key) => key,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using emergency key", e);
                    "emergency-fallback-key-must-be-replaced-in-production".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            access_expire_minutes: std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            refresh_expire_days: std::env::var("REFRESH_TOKEN_EXPIRE_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "hr-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "hr-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 角色名称
    pub role: String,
    /// 令牌类型: access | refresh
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

impl Claims {
    /// 解析 subject 为用户 ID
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("Malformed subject: {}", self.sub)))
    }
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌类型错误: expected {expected}, got {actual}")]
    WrongTokenType {
        expected: &'static str,
        actual: String,
    },

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl From<JwtError> for shared::AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => shared::AppError::token_expired(),
            JwtError::InvalidToken(_)
            | JwtError::InvalidSignature
            | JwtError::WrongTokenType { .. } => shared::AppError::invalid_token("Invalid token"),
            JwtError::GenerationFailed(msg) | JwtError::ConfigError(msg) => {
                shared::AppError::internal(msg)
            }
        }
    }
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut key = String::new();

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            // 如果随机数生成失败，使用固定的安全密钥
            return "HrServerDevelopmentSecureKey2025!ChangeMe".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        if let Some(c) = allowed_chars.chars().nth(idx) {
            key.push(c);
        }
    }

    key
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "JWT_SECRET not set! Generating secure temporary key for development."
                );
                Ok(generate_secure_printable_jwt_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成访问令牌
    pub fn generate_access_token(&self, user_id: i64, role: UserRole) -> Result<String, JwtError> {
        self.generate(
            user_id,
            role,
            TOKEN_TYPE_ACCESS,
            Duration::minutes(self.config.access_expire_minutes),
        )
    }

    /// 为用户生成刷新令牌
    pub fn generate_refresh_token(&self, user_id: i64, role: UserRole) -> Result<String, JwtError> {
        self.generate(
            user_id,
            role,
            TOKEN_TYPE_REFRESH,
            Duration::days(self.config.refresh_expire_days),
        )
    }

    fn generate(
        &self,
        user_id: i64,
        role: UserRole,
        token_type: &str,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 验证访问令牌 (拒绝刷新令牌冒充)
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TOKEN_TYPE_ACCESS)
    }

    /// 验证刷新令牌
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TOKEN_TYPE_REFRESH)
    }

    fn validate_typed(&self, token: &str, expected: &'static str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(JwtError::WrongTokenType {
                expected,
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (认证中间件每次请求从数据库重新加载)
///
/// 被删除的用户 → 401，被停用的用户 → 403，
/// 因此 handler 拿到的 CurrentUser 一定是活跃账号。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: i64,
    /// 邮箱
    pub email: String,
    /// 角色
    pub role: UserRole,
    /// 关联的员工档案 ID
    pub employee_id: Option<i64>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            employee_id: user.employee_id,
        }
    }
}

impl CurrentUser {
    /// 是否 HR 管理员
    pub fn is_hr_admin(&self) -> bool {
        self.role == UserRole::HrAdmin
    }

    /// 取关联员工档案 ID，未关联时报 400
    pub fn require_employee_id(&self) -> Result<i64, crate::AppError> {
        self.employee_id.ok_or_else(|| {
            crate::AppError::invalid_request("User is not linked to an employee profile")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "unit-test-secret-key-at-least-32-chars!!".to_string(),
            access_expire_minutes: 30,
            refresh_expire_days: 7,
            issuer: "hr-server".to_string(),
            audience: "hr-clients".to_string(),
        })
    }

    #[test]
    fn test_access_token_roundtrip() {
        let service = test_service();
        let token = service
            .generate_access_token(42, UserRole::Manager)
            .expect("generate");

        let claims = service.validate_access_token(&token).expect("validate");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, "MANAGER");
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let service = test_service();
        let refresh = service
            .generate_refresh_token(7, UserRole::Employee)
            .expect("generate");

        assert!(service.validate_refresh_token(&refresh).is_ok());
        let err = service.validate_access_token(&refresh).unwrap_err();
        assert!(matches!(err, JwtError::WrongTokenType { .. }));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service
            .generate_access_token(1, UserRole::HrAdmin)
            .expect("generate");

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = test_service()
            .generate_access_token(7, UserRole::Employee)
            .expect("generate");

        let other = JwtService::with_config(JwtConfig {
            secret: "a-completely-different-secret-value!!!!!".to_string(),
            access_expire_minutes: 30,
            refresh_expire_days: 7,
            issuer: "hr-server".to_string(),
            audience: "hr-clients".to_string(),
        });
        let err = other.validate_access_token(&token).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts the expiry beyond the validator's leeway.
        let service = JwtService::with_config(JwtConfig {
            secret: "unit-test-secret-key-at-least-32-chars!!".to_string(),
            access_expire_minutes: -5,
            refresh_expire_days: 7,
            issuer: "hr-server".to_string(),
            audience: "hr-clients".to_string(),
        });
        let token = service
            .generate_access_token(42, UserRole::Employee)
            .expect("generate");
        let err = service.validate_access_token(&token).unwrap_err();
        assert!(matches!(err, JwtError::ExpiredToken));
    }

    #[test]
    fn test_bearer_scheme_required() {
        assert_eq!(
            JwtService::extract_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(JwtService::extract_from_header("Token abc"), None);
        assert_eq!(JwtService::extract_from_header("bearer abc"), None);
    }

    #[test]
    fn test_printable_secret_length() {
        let secret = generate_secure_printable_jwt_secret();
        assert!(secret.len() >= 32);
    }
}
