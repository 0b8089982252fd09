//! Permission Definitions
//!
//! ## 设计原则
//! - 订单操作（下单、完成、取消、释放桌台）无需权限，登录即可使用
//! - 管理操作（菜单、桌台、用户、设置）仅 administrator 角色可用

use shared::models::Role;

/// 菜单管理（商品 增删改）
pub const MENU_MANAGE: &str = "menu:manage";
/// 桌台管理（桌台 增删改）
pub const TABLES_MANAGE: &str = "tables:manage";
/// 用户管理
pub const USERS_MANAGE: &str = "users:manage";
/// 系统设置
pub const SETTINGS_MANAGE: &str = "settings:manage";
/// 超级权限
pub const ALL: &str = "all";

/// 管理员专属权限
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &[MENU_MANAGE, TABLES_MANAGE, USERS_MANAGE, SETTINGS_MANAGE];

/// Default permissions for a role
pub fn default_permissions(role: Role) -> Vec<String> {
    match role {
        Role::Administrator => vec![ALL.to_string()],
        Role::Server | Role::Cashier | Role::Cook => vec![],
    }
}
