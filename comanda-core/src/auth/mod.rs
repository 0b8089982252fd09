//! 认证授权模块
//!
//! - [`AuthService`] - 登录、默认用户会话
//! - [`CurrentUser`] - 当前用户上下文
//! - [`permissions`] - 管理操作权限

pub mod current_user;
pub mod permissions;
pub mod service;

pub use current_user::CurrentUser;
pub use service::AuthService;
