use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use shared::error::AppError;
use sqlx::SqlitePool;
use tokio::sync::watch;

use crate::auth::AuthService;
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::{DbService, seed};
use crate::orders::{OrdersManager, Session, SubmitOutcome};
use crate::printing::{TicketData, TicketService, TicketStyle};
use crate::services::{CatalogService, UserService};
use crate::settings::{SettingsService, keys};
use crate::tables::{TableBoard, TableBoardRefresher, TableService};

/// 提交结果 + 小票输出结果
///
/// 小票失败不影响已提交的订单。
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub submitted: SubmitOutcome,
    /// `None` when ticket generation is disabled
    pub ticket: Option<Result<PathBuf, AppError>>,
}

/// 核心状态 - 持有所有服务的单例引用
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 进程配置 (不可变) |
/// | pool | SQLite 连接池 (单连接) |
/// | settings | 业务开关缓存 |
/// | auth | 登录 / 会话 |
/// | catalog | 商品 |
/// | users | 用户管理 |
/// | tables | 桌台管理与看板 |
/// | orders | 订单生命周期 (Arc 共享，持有事件通道) |
/// | tickets | 小票输出 |
#[derive(Clone)]
pub struct CoreState {
    pub config: Config,
    pub pool: SqlitePool,
    pub settings: SettingsService,
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub users: UserService,
    pub tables: TableService,
    pub orders: Arc<OrdersManager>,
    pub tickets: TicketService,
}

impl CoreState {
    /// 初始化核心状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 数据库 (迁移)
    /// 3. 种子数据 (管理员、示例商品和桌台)
    /// 4. 业务配置 (缺失的默认值)
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db = DbService::new(&config.database_path).await?;
        Self::with_db(config, db).await
    }

    /// 使用已打开的数据库构造 (测试使用内存库)
    pub async fn with_db(config: &Config, db: DbService) -> anyhow::Result<Self> {
        let pool = db.pool;

        let report = seed::run(&pool).await?;
        tracing::info!(
            admin_created = report.admin_created,
            products = report.products,
            tables = report.tables,
            "Seed data checked"
        );

        let settings = SettingsService::load(pool.clone()).await?;

        Ok(Self {
            config: config.clone(),
            settings,
            auth: AuthService::new(pool.clone()),
            catalog: CatalogService::new(pool.clone()),
            users: UserService::new(pool.clone()),
            tables: TableService::new(pool.clone()),
            orders: Arc::new(OrdersManager::new(pool.clone(), config.timezone)),
            tickets: TicketService::new(config.tickets_dir(), config.ticket_width, config.timezone),
            pool,
        })
    }

    /// 启动后台任务
    ///
    /// - 桌台看板刷新 (Worker)
    /// - 日志清理 (Periodic, 仅写文件日志时)
    ///
    /// 返回看板订阅端。
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) -> watch::Receiver<Arc<TableBoard>> {
        let refresher = TableBoardRefresher::new(
            self.tables.clone(),
            self.settings.clone(),
            self.orders.subscribe(),
            Duration::from_secs(self.config.table_refresh_secs),
            Duration::from_secs(self.config.table_refresh_retry_secs),
        );
        let board = refresher.subscribe();
        let shutdown = tasks.shutdown_token();
        tasks.spawn("table_board_refresh", TaskKind::Worker, refresher.run(shutdown.clone()));

        if self.config.log_to_file {
            tasks.spawn(
                "log_cleanup",
                TaskKind::Periodic,
                crate::utils::logger::run_log_cleanup(self.config.logs_dir(), shutdown),
            );
        }

        board
    }

    /// 开始会话 (登录开启时需要用户名和密码)
    pub async fn start_session(&self, credentials: Option<(&str, &str)>) -> Result<Session, AppError> {
        let flags = self.settings.flags();
        let user = self.auth.start_session(&flags, credentials).await?;
        Ok(Session::new(user))
    }

    /// 提交会话中的草稿，按配置生成小票
    pub async fn checkout(&self, session: &mut Session) -> Result<CheckoutOutcome, AppError> {
        let flags = self.settings.flags();
        let submitted = self.orders.submit_session(session, &flags).await?;

        let ticket = if flags.generate_tickets {
            Some(
                self.print_ticket(submitted.order.id, TicketStyle::WithCustomerStub)
                    .await,
            )
        } else {
            None
        };

        Ok(CheckoutOutcome { submitted, ticket })
    }

    /// 为已提交的订单生成小票 (可重复打印)
    pub async fn print_ticket(&self, order_id: i64, style: TicketStyle) -> Result<PathBuf, AppError> {
        let detail = self.orders.detail(order_id).await?;
        let data = TicketData::from_detail(
            &detail,
            &self.settings.get_text(keys::BUSINESS_NAME),
            &self.settings.get_text(keys::CURRENCY),
        );
        self.tickets.print(&data, style).await
    }
}
