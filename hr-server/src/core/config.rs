use chrono_tz::Tz;

use crate::auth::JwtConfig;

/// 服务器配置 - HR 平台的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HOST | 0.0.0.0 | 监听地址 |
/// | PORT | 8000 | HTTP 服务端口 |
/// | DATABASE_PATH | data/hr.db | SQLite 数据库文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | UTC | 业务时区 (考勤日期、年度结算) |
/// | UPLOAD_DIR | uploads | 员工文档存储目录 |
/// | MAX_UPLOAD_SIZE | 10485760 | 上传大小上限 (字节) |
/// | ALLOWED_EXTENSIONS | pdf,doc,docx,jpg,jpeg,png | 允许的文档扩展名 |
/// | WEBHOOK_API_KEY | (dev default) | 入站/出站 Webhook 共享密钥 |
/// | PAYROLL_SERVICE_URL | https://external-payroll-service.com/api | 外部工资服务 |
/// | CALENDAR_SERVICE_URL | https://external-calendar-service.com/api | 外部日历服务 |
/// | PAYROLL_ALLOWANCE_RATE | 0.10 | 津贴比例 (基本工资的倍数) |
/// | PAYROLL_TAX_RATE | 0.15 | 税率 |
/// | PAYROLL_DEDUCTION_RATE | 0.05 | 扣款比例 |
/// | JOB_QUEUE_SIZE | 256 | 后台任务队列容量 |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | (unset) | 空库时引导的 HR_ADMIN 账号 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/hr.db PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 应用名称 (health 接口返回)
    pub app_name: String,
    /// 监听地址
    pub host: String,
    /// HTTP API 服务端口
    pub port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区 (解析失败回退 UTC)
    pub timezone: Tz,

    // === 文件存储 ===
    /// 员工文档存储目录
    pub upload_dir: String,
    /// 上传大小上限 (字节)
    pub max_upload_size: u64,
    /// 允许的文档扩展名 (小写)
    pub allowed_extensions: Vec<String>,

    // === 外部集成 ===
    /// Webhook 共享密钥 (X-API-Key)
    pub webhook_api_key: String,
    /// 外部工资服务 URL
    pub payroll_service_url: String,
    /// 外部日历服务 URL
    pub calendar_service_url: String,

    // === 工资计算比例 ===
    /// 津贴比例
    pub allowance_rate: f64,
    /// 税率
    pub tax_rate: f64,
    /// 扣款比例
    pub deduction_rate: f64,

    // === 后台任务 ===
    /// 任务队列容量
    pub job_queue_size: usize,

    // === 引导账号 ===
    /// 空库时创建的管理员邮箱
    pub admin_email: Option<String>,
    /// 空库时创建的管理员密码
    pub admin_password: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|tz| {
                tz.parse::<Tz>()
                    .map_err(|_| tracing::warn!("Unknown TIMEZONE '{}', falling back to UTC", tz))
                    .ok()
            })
            .unwrap_or(Tz::UTC);

        Self {
            app_name: std::env::var("APP_NAME").unwrap_or_else(|_| "hr-server".into()),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/hr.db".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone,

            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_485_760),
            allowed_extensions: std::env::var("ALLOWED_EXTENSIONS")
                .unwrap_or_else(|_| "pdf,doc,docx,jpg,jpeg,png".into())
                .split(',')
                .map(|ext| ext.trim().to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),

            webhook_api_key: std::env::var("WEBHOOK_API_KEY")
                .unwrap_or_else(|_| "dev-webhook-key-change-this".into()),
            payroll_service_url: std::env::var("PAYROLL_SERVICE_URL")
                .unwrap_or_else(|_| "https://external-payroll-service.com/api".into()),
            calendar_service_url: std::env::var("CALENDAR_SERVICE_URL")
                .unwrap_or_else(|_| "https://external-calendar-service.com/api".into()),

            allowance_rate: std::env::var("PAYROLL_ALLOWANCE_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.10),
            tax_rate: std::env::var("PAYROLL_TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.15),
            deduction_rate: std::env::var("PAYROLL_DEDUCTION_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.05),

            job_queue_size: std::env::var("JOB_QUEUE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),

            admin_email: std::env::var("ADMIN_EMAIL").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
