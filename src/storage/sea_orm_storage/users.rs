use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::roles::{Column as RoleColumn, Entity as Roles, Model as RoleModel};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{EduChainError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    users::{
        entities::{User, UserRole},
        requests::{NewUser, UserChanges, UserListQuery},
        responses::{UserListItem, UserListResponse},
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 角色表全部行，按 ID 索引
    pub(crate) async fn roles_by_id(&self) -> Result<HashMap<i64, RoleModel>> {
        let roles = Roles::find()
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(roles.into_iter().map(|r| (r.id, r)).collect())
    }

    /// 角色名对应的角色 ID
    pub(crate) async fn role_id(&self, role: &UserRole) -> Result<i64> {
        Roles::find()
            .filter(RoleColumn::RoleName.eq(role.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询角色失败: {e}")))?
            .map(|r| r.id)
            .ok_or_else(|| EduChainError::not_found(format!("角色不存在: {role}")))
    }

    /// 数据库行批量转换为业务用户
    pub(crate) async fn users_from_models(
        &self,
        models: Vec<crate::entity::users::Model>,
    ) -> Result<Vec<User>> {
        let roles = self.roles_by_id().await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let role = roles.get(&m.role_id).cloned();
                m.into_user(role)
            })
            .collect())
    }

    /// 创建用户
    pub async fn create_user_impl(&self, user: NewUser) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let role_id = self.role_id(&user.role).await?;

        let model = ActiveModel {
            firstname: Set(user.firstname),
            lastname: Set(user.lastname),
            email: Set(user.email.to_lowercase()),
            password_hash: Set(user.password_hash),
            role_id: Set(role_id),
            status: Set(user.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("创建用户失败: {e}")))?;

        let role = Roles::find_by_id(role_id)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询角色失败: {e}")))?;

        Ok(result.into_user(role))
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .find_also_related(Roles)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|(m, role)| m.into_user(role)))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .find_also_related(Roles)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|(m, role)| m.into_user(role)))
    }

    /// 批量获取用户
    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Users::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询用户失败: {e}")))?;

        self.users_from_models(models).await
    }

    /// 分页列出用户（不含管理员），按姓、名排序
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);
        let admin_role_id = self.role_id(&UserRole::Admin).await?;

        let mut select = Users::find().filter(Column::RoleId.ne(admin_role_id));

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Firstname.like(like_contains(search)))
                    .add(Column::Lastname.like(like_contains(search)))
                    .add(Column::Email.like(like_contains(&search.to_lowercase()))),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            let role_id = self.role_id(role).await?;
            select = select.filter(Column::RoleId.eq(role_id));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select
            .order_by_asc(Column::Lastname)
            .order_by_asc(Column::Firstname);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询用户总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: self
                .users_from_models(models)
                .await?
                .into_iter()
                .map(UserListItem::from)
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EduChainError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        // 先检查用户是否存在
        if Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询用户失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(firstname) = changes.firstname {
            model.firstname = Set(firstname);
        }

        if let Some(lastname) = changes.lastname {
            model.lastname = Set(lastname);
        }

        if let Some(email) = changes.email {
            model.email = Set(email.to_lowercase());
        }

        if let Some(password_hash) = changes.password_hash {
            model.password_hash = Set(password_hash);
        }

        if let Some(role) = changes.role {
            model.role_id = Set(self.role_id(&role).await?);
        }

        if let Some(status) = changes.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("统计用户数量失败: {e}")))
    }

    /// 按角色统计用户数量
    pub async fn count_users_by_role_impl(&self, role: UserRole) -> Result<u64> {
        let role_id = self.role_id(&role).await?;

        Users::find()
            .filter(Column::RoleId.eq(role_id))
            .count(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("统计用户数量失败: {e}")))
    }

    /// 写入钱包地址与加密私钥
    pub async fn set_user_wallet_impl(
        &self,
        id: i64,
        address: &str,
        encrypted_key: &str,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(
                Column::WalletAddress,
                sea_orm::sea_query::Expr::value(address.to_string()),
            )
            .col_expr(
                Column::EncryptedPrivateKey,
                sea_orm::sea_query::Expr::value(encrypted_key.to_string()),
            )
            .col_expr(Column::WalletCreatedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("保存钱包信息失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出尚未开通链上身份的教师与学生
    pub async fn list_users_without_wallet_impl(&self) -> Result<Vec<User>> {
        let mut role_ids = Vec::new();
        for role in UserRole::chain_roles() {
            role_ids.push(self.role_id(role).await?);
        }

        let models = Users::find()
            .filter(Column::RoleId.is_in(role_ids))
            .filter(
                Condition::any()
                    .add(Column::WalletAddress.is_null())
                    .add(Column::WalletAddress.eq(""))
                    .add(Column::EncryptedPrivateKey.is_null())
                    .add(Column::EncryptedPrivateKey.eq("")),
            )
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询用户失败: {e}")))?;

        self.users_from_models(models).await
    }
}
