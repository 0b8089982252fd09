//! Comanda Core - 餐厅点单与桌台状态核心
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 草稿、提交、制作、完成、取消，单号生成
//! - **桌台** (`tables`): 占用/释放、看板指示、定时刷新
//! - **数据库** (`db`): SQLite (sqlx)，迁移与种子数据
//! - **配置** (`settings`): `configuration` 表中的业务开关
//! - **认证** (`auth`): 登录、角色与权限
//! - **小票** (`printing`): 文本小票输出
//!
//! # 模块结构
//!
//! ```text
//! comanda-core/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── auth/          # 会话用户、权限
//! ├── services/      # 商品、用户
//! ├── db/            # 数据库层
//! ├── orders/        # 订单生命周期
//! ├── tables/        # 桌台状态
//! ├── settings/      # 业务配置
//! ├── printing/      # 小票
//! └── utils/         # 日志、时间、校验
//! ```

pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod printing;
pub mod services;
pub mod settings;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use auth::{AuthService, CurrentUser};
pub use crate::core::{BackgroundTasks, CheckoutOutcome, Config, CoreState};
pub use orders::{OrdersManager, Session};
pub use settings::{FeatureFlags, SettingsService};
pub use tables::{TableBoard, TableService};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 初始化日志 (按配置写入 `{WORK_DIR}/logs`)
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    let log_dir = config.log_to_file.then(|| config.logs_dir());
    init_logger_with_file(&config.log_level, config.log_json, log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
   ______                                __
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
