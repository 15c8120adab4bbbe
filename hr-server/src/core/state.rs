use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::core::tasks::BackgroundTasks;
use crate::db::{DbService, repository};
use crate::services::{Job, JobQueueService, NotifierService};
use shared::models::UserRole;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是整个服务的核心数据结构, 使用 Arc 实现浅拷贝,
/// 克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | jobs | JobQueueService | 后台任务队列 (发送端) |
/// | notifier | NotifierService | 外部回调客户端 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    jwt_service: Arc<JwtService>,
    /// 任务队列发送端
    jobs: JobQueueService,
    /// 外部通知客户端
    notifier: NotifierService,
    /// 队列接收端, start_background_tasks 取走后交给 worker
    worker_rx: Arc<Mutex<Option<mpsc::Receiver<Job>>>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化:
    /// 1. 数据库 (连接池 + 迁移)
    /// 2. JWT 服务
    /// 3. 任务队列与外部通知客户端
    /// 4. 管理员账号引导 (用户表为空时)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let db = DbService::new(&config.database_path)
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let (jobs, worker_rx) = JobQueueService::new(config.job_queue_size);
        let notifier = NotifierService::new(config);

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
            jobs,
            notifier,
            worker_rx: Arc::new(Mutex::new(Some(worker_rx))),
        };

        state.bootstrap_admin().await;
        state
    }

    /// 启动后台任务, 返回持有任务句柄的管理器
    ///
    /// 必须在 `Server::run()` 之前 (或由其) 调用; 重复调用只会注册
    /// 一次 worker。
    pub async fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let rx = {
            let mut guard = self
                .worker_rx
                .lock()
                .expect("worker receiver lock poisoned");
            guard.take()
        };

        match rx {
            Some(rx) => {
                let state = self.clone();
                let shutdown = tasks.shutdown_token();
                tasks.spawn("job_worker", async move {
                    crate::services::worker::run(state, rx, shutdown).await;
                });
                tracing::info!("Background tasks registered: {} total", tasks.len());
            }
            None => {
                tracing::warn!("Background tasks already started, skipping");
            }
        }

        tasks
    }

    /// 获取数据库服务
    pub fn get_db(&self) -> &DbService {
        &self.db
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 任务队列发送端
    pub fn jobs(&self) -> &JobQueueService {
        &self.jobs
    }

    /// 外部通知客户端
    pub fn notifier(&self) -> &NotifierService {
        &self.notifier
    }

    /// 用户表为空时用 ADMIN_EMAIL / ADMIN_PASSWORD 创建首个管理员。
    /// 失败只记日志, 不阻止启动。
    async fn bootstrap_admin(&self) {
        let count = match repository::user::count(self.db.pool()).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "Admin bootstrap: failed to count users");
                return;
            }
        };
        if count > 0 {
            return;
        }

        let (Some(email), Some(password)) =
            (&self.config.admin_email, &self.config.admin_password)
        else {
            tracing::warn!(
                "No user accounts exist and ADMIN_EMAIL / ADMIN_PASSWORD are not set; login will be impossible"
            );
            return;
        };

        let password_hash = match crate::auth::password::hash_password(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(error = %e, "Admin bootstrap: failed to hash password");
                return;
            }
        };

        match repository::user::create(self.db.pool(), email, &password_hash, UserRole::HrAdmin, None)
            .await
        {
            Ok(user) => {
                crate::security_log!("INFO", "admin_bootstrap", user_id = user.id, email = user.email.clone());
                tracing::info!(email = user.email.clone(), "Bootstrap HR admin account created");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Admin bootstrap: failed to create account");
            }
        }
    }
}
