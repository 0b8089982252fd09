use chrono_tz::Tz;
use std::path::PathBuf;

/// 进程配置 - 运行 comanda 所需的全部环境参数
///
/// 业务开关 (use_tables, generate_tickets, ...) 不在这里，
/// 它们存储在数据库 `configuration` 表中，见 [`crate::settings`]。
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、小票、日志) |
/// | DATABASE_PATH | {WORK_DIR}/comandas.db | SQLite 文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志格式 |
/// | LOG_TO_FILE | true | 写入 {WORK_DIR}/logs |
/// | TIMEZONE | Europe/Madrid | 业务时区 (订单号日期、今日统计) |
/// | TABLE_REFRESH_SECS | 30 | 桌台看板刷新间隔 |
/// | TABLE_REFRESH_RETRY_SECS | 60 | 刷新失败后的重试间隔 |
/// | TICKET_WIDTH | 48 | 小票列宽 (字符) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/comandas TIMEZONE=America/Argentina/Buenos_Aires cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、小票、日志
    pub work_dir: PathBuf,
    /// 数据库文件路径
    pub database_path: PathBuf,
    /// 运行环境: development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_to_file: bool,
    /// 业务时区
    pub timezone: Tz,
    pub table_refresh_secs: u64,
    pub table_refresh_retry_secs: u64,
    pub ticket_width: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let work_dir: PathBuf = std::env::var("WORK_DIR")
            .unwrap_or_else(|_| "./work_dir".into())
            .into();
        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| work_dir.join("comandas.db"));

        Self {
            database_path,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_to_file: std::env::var("LOG_TO_FILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chrono_tz::Europe::Madrid),
            table_refresh_secs: std::env::var("TABLE_REFRESH_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(30),
            table_refresh_retry_secs: std::env::var("TABLE_REFRESH_RETRY_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(60),
            ticket_width: std::env::var("TICKET_WIDTH")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|w| *w >= 24)
                .unwrap_or(48),
            work_dir,
        }
    }

    /// 使用指定工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = config.work_dir.join("comandas.db");
        config
    }

    /// 小票输出目录
    pub fn tickets_dir(&self) -> PathBuf {
        self.work_dir.join("tickets")
    }

    /// 日志目录
    pub fn logs_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
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
