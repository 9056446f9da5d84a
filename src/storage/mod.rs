use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息（不区分大小写）
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 列出非管理员用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 按角色统计用户数量
    async fn count_users_by_role(&self, role: UserRole) -> Result<u64>;
    // 写入钱包地址与加密私钥
    async fn set_user_wallet(&self, id: i64, address: &str, encrypted_key: &str) -> Result<bool>;
    // 列出尚未开通链上身份的教师与学生
    async fn list_users_without_wallet(&self) -> Result<Vec<User>>;

    /// 课程管理方法
    async fn create_course(&self, course: NewCourse) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    async fn get_course_summary(&self, id: i64) -> Result<Option<CourseSummary>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 教师负责的课程
    async fn list_professor_courses(&self, professor_id: i64) -> Result<Vec<CourseSummary>>;
    // 学生已选的课程
    async fn list_student_courses(&self, student_id: i64) -> Result<Vec<CourseSummary>>;
    async fn update_course(&self, id: i64, changes: CourseChanges) -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 选课管理方法
    async fn create_enrollment(&self, student_id: i64, course_id: i64) -> Result<Enrollment>;
    async fn get_enrollment_detail(&self, id: i64) -> Result<Option<EnrollmentDetail>>;
    async fn is_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
    // 批量选课，已选的学生跳过并给出原因
    async fn bulk_enroll(
        &self,
        course_id: i64,
        student_ids: &[i64],
    ) -> Result<BulkEnrollmentResponse>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_professor_assignments(
        &self,
        professor_id: i64,
    ) -> Result<Vec<ProfessorAssignmentItem>>;
    async fn list_student_assignments(&self, student_id: i64)
    -> Result<Vec<StudentAssignmentItem>>;
    // 回写链上交易哈希与链上作业 ID
    async fn set_assignment_chain_record(
        &self,
        id: i64,
        tx_hash: &str,
        chain_assignment_id: i64,
    ) -> Result<bool>;

    /// 提交与评分方法
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_submission_detail(&self, id: i64) -> Result<Option<SubmissionDetail>>;
    async fn find_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_student_submissions(
        &self,
        student_id: i64,
        graded_only: bool,
    ) -> Result<Vec<SubmissionDetail>>;
    async fn list_professor_submissions(
        &self,
        professor_id: i64,
        pending_only: bool,
    ) -> Result<Vec<SubmissionDetail>>;
    // 评分只对未评分的提交生效，返回 None 表示已被评分
    async fn grade_submission(
        &self,
        id: i64,
        grade: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;
    async fn set_submission_chain_record(
        &self,
        id: i64,
        tx_hash: &str,
        chain_submission_id: i64,
    ) -> Result<bool>;
    async fn set_submission_result_hash(&self, id: i64, result_tx_hash: &str) -> Result<bool>;

    /// 公告方法
    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement>;
    async fn list_announcements_by_author(&self, author_id: i64)
    -> Result<Vec<AnnouncementDetail>>;
    // 全局公告 + 已选课程的公告
    async fn list_student_announcements(&self, student_id: i64)
    -> Result<Vec<AnnouncementDetail>>;

    /// 系统总览
    async fn system_overview(&self) -> Result<SystemOverview>;

    /// 链上动态
    async fn list_mirrored_assignments(
        &self,
        professor_id: i64,
        limit: u64,
    ) -> Result<Vec<MirroredAssignment>>;
    async fn list_published_results(
        &self,
        professor_id: i64,
        limit: u64,
    ) -> Result<Vec<SubmissionDetail>>;
    async fn list_mirrored_submissions(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<SubmissionDetail>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
