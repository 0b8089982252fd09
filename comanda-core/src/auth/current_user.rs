//! 当前用户上下文

use super::permissions;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User};

/// 会话中的操作者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// 用户 ID，临时管理员会话为 `None`
    pub id: Option<i64>,
    /// 用户名
    pub username: String,
    /// 显示名称（订单 created_by、小票）
    pub display_name: String,
    pub role: Role,
    /// 权限列表
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn new(
        id: Option<i64>,
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            role,
            permissions: permissions::default_permissions(role),
        }
    }

    /// 登录关闭且默认用户不存在时使用的临时管理员
    pub fn temporary_admin() -> Self {
        Self::new(None, "admin", "Administrator", Role::Administrator)
    }

    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// 检查是否拥有指定权限
    ///
    /// 管理员或拥有 `"all"` 权限则拥有所有权限
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }
        self.permissions
            .iter()
            .any(|p| p == permissions::ALL || p == permission)
    }

    /// 权限检查，拒绝时记录安全日志
    pub fn require_permission(&self, permission: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            return Ok(());
        }
        crate::security_log!(
            WARN,
            "permission_denied",
            user = %self.username,
            role = %self.role.as_str(),
            permission = %permission
        );
        Err(AppError::with_message(
            ErrorCode::AdminRequired,
            format!("'{permission}' requires an administrator"),
        )
        .with_detail("permission", permission))
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self::new(Some(user.id), &user.username, &user.display_name, user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_every_permission() {
        let admin = CurrentUser::new(Some(1), "admin", "Admin", Role::Administrator);
        for p in permissions::ADMIN_ONLY_PERMISSIONS {
            assert!(admin.require_permission(p).is_ok());
        }
        assert!(CurrentUser::temporary_admin().is_admin());
    }

    #[test]
    fn test_staff_denied_admin_operations() {
        for role in [Role::Server, Role::Cashier, Role::Cook] {
            let user = CurrentUser::new(Some(2), "ana", "Ana", role);
            let err = user
                .require_permission(permissions::TABLES_MANAGE)
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::AdminRequired);
        }
    }
}
