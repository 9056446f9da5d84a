//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod announcements;
mod assignments;
mod chain;
mod courses;
mod enrollments;
mod overview;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{EduChainError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::migrated(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 内存 SQLite，供测试与一次性工具使用
    ///
    /// 内存库的生命周期绑定在连接上，因此连接池固定为单连接且不回收。
    pub async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| EduChainError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| EduChainError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Self::migrated(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)).await
    }

    async fn migrated(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| EduChainError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EduChainError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-32000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EduChainError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| EduChainError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EduChainError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    announcements::{
        entities::{Announcement, AnnouncementDetail},
        requests::NewAnnouncement,
    },
    assignments::{
        entities::{Assignment, ProfessorAssignmentItem, StudentAssignmentItem},
        requests::NewAssignment,
    },
    blockchain::entities::MirroredAssignment,
    courses::{
        entities::{Course, CourseSummary},
        requests::{CourseChanges, CourseListQuery, NewCourse},
        responses::CourseListResponse,
    },
    enrollments::{
        entities::{Enrollment, EnrollmentDetail},
        requests::EnrollmentListQuery,
        responses::{BulkEnrollmentResponse, EnrollmentListResponse},
    },
    submissions::{
        entities::{Submission, SubmissionDetail},
        requests::NewSubmission,
    },
    system::responses::SystemOverview,
    users::{
        entities::{User, UserRole},
        requests::{NewUser, UserChanges, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        self.update_user_impl(id, changes).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<u64> {
        self.count_users_by_role_impl(role).await
    }

    async fn set_user_wallet(&self, id: i64, address: &str, encrypted_key: &str) -> Result<bool> {
        self.set_user_wallet_impl(id, address, encrypted_key).await
    }

    async fn list_users_without_wallet(&self) -> Result<Vec<User>> {
        self.list_users_without_wallet_impl().await
    }

    // 课程模块
    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn get_course_summary(&self, id: i64) -> Result<Option<CourseSummary>> {
        self.get_course_summary_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn list_professor_courses(&self, professor_id: i64) -> Result<Vec<CourseSummary>> {
        self.list_professor_courses_impl(professor_id).await
    }

    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<CourseSummary>> {
        self.list_student_courses_impl(student_id).await
    }

    async fn update_course(&self, id: i64, changes: CourseChanges) -> Result<Option<Course>> {
        self.update_course_impl(id, changes).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 选课模块
    async fn create_enrollment(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        self.create_enrollment_impl(student_id, course_id).await
    }

    async fn get_enrollment_detail(&self, id: i64) -> Result<Option<EnrollmentDetail>> {
        self.get_enrollment_detail_impl(id).await
    }

    async fn is_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool> {
        self.is_enrolled_impl(student_id, course_id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    async fn bulk_enroll(
        &self,
        course_id: i64,
        student_ids: &[i64],
    ) -> Result<BulkEnrollmentResponse> {
        self.bulk_enroll_impl(course_id, student_ids).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_professor_assignments(
        &self,
        professor_id: i64,
    ) -> Result<Vec<ProfessorAssignmentItem>> {
        self.list_professor_assignments_impl(professor_id).await
    }

    async fn list_student_assignments(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAssignmentItem>> {
        self.list_student_assignments_impl(student_id).await
    }

    async fn set_assignment_chain_record(
        &self,
        id: i64,
        tx_hash: &str,
        chain_assignment_id: i64,
    ) -> Result<bool> {
        self.set_assignment_chain_record_impl(id, tx_hash, chain_assignment_id)
            .await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_detail(&self, id: i64) -> Result<Option<SubmissionDetail>> {
        self.get_submission_detail_impl(id).await
    }

    async fn find_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.find_submission_impl(assignment_id, student_id).await
    }

    async fn list_student_submissions(
        &self,
        student_id: i64,
        graded_only: bool,
    ) -> Result<Vec<SubmissionDetail>> {
        self.list_student_submissions_impl(student_id, graded_only)
            .await
    }

    async fn list_professor_submissions(
        &self,
        professor_id: i64,
        pending_only: bool,
    ) -> Result<Vec<SubmissionDetail>> {
        self.list_professor_submissions_impl(professor_id, pending_only)
            .await
    }

    async fn grade_submission(
        &self,
        id: i64,
        grade: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(id, grade, feedback).await
    }

    async fn set_submission_chain_record(
        &self,
        id: i64,
        tx_hash: &str,
        chain_submission_id: i64,
    ) -> Result<bool> {
        self.set_submission_chain_record_impl(id, tx_hash, chain_submission_id)
            .await
    }

    async fn set_submission_result_hash(&self, id: i64, result_tx_hash: &str) -> Result<bool> {
        self.set_submission_result_hash_impl(id, result_tx_hash)
            .await
    }

    // 公告模块
    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        self.create_announcement_impl(announcement).await
    }

    async fn list_announcements_by_author(
        &self,
        author_id: i64,
    ) -> Result<Vec<AnnouncementDetail>> {
        self.list_announcements_by_author_impl(author_id).await
    }

    async fn list_student_announcements(
        &self,
        student_id: i64,
    ) -> Result<Vec<AnnouncementDetail>> {
        self.list_student_announcements_impl(student_id).await
    }

    // 系统总览
    async fn system_overview(&self) -> Result<SystemOverview> {
        self.system_overview_impl().await
    }

    // 链上动态
    async fn list_mirrored_assignments(
        &self,
        professor_id: i64,
        limit: u64,
    ) -> Result<Vec<MirroredAssignment>> {
        self.list_mirrored_assignments_impl(professor_id, limit)
            .await
    }

    async fn list_published_results(
        &self,
        professor_id: i64,
        limit: u64,
    ) -> Result<Vec<SubmissionDetail>> {
        self.list_published_results_impl(professor_id, limit).await
    }

    async fn list_mirrored_submissions(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<SubmissionDetail>> {
        self.list_mirrored_submissions_impl(student_id, limit).await
    }
}
