//! 核心模块 - 进程配置、状态和后台任务
//!
//! # 模块结构
//!
//! - [`Config`] - 进程配置
//! - [`CoreState`] - 服务单例
//! - [`BackgroundTasks`] - 后台任务管理

pub mod config;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use state::{CheckoutOutcome, CoreState};
pub use tasks::{BackgroundTasks, TaskKind};
