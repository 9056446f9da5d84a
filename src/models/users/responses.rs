use super::entities::User;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 单个用户的创建 / 更新 / 查询结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub user: User,
}

/// 管理端用户列表中的一行
///
/// 在用户字段之外标出链上身份是否已开通，便于管理员发现需要补开通的账户。
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub user: User,
    pub chain_ready: bool,
}

impl From<User> for UserListItem {
    fn from(user: User) -> Self {
        Self {
            chain_ready: user.has_chain_profile(),
            user,
        }
    }
}

// 非管理员用户分页列表，按姓、名排序
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<UserListItem>,
    pub pagination: PaginationInfo,
}
