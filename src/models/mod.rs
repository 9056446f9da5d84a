//! 数据模型定义
//!
//! 每个资源目录下分为 `entities`（业务实体）、`requests`（请求体 / 查询参数）
//! 与 `responses`（响应体）。

pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod blockchain;
pub mod common;
pub mod courses;
pub mod enrollments;
pub mod submissions;
pub mod system;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 `ApiResponse.code` 返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    RateLimitExceeded = 1029,

    // 认证
    AuthFailed = 2000,
    RoleMismatch = 2001,
    AccountInactive = 2002,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserNameInvalid = 3004,
    UserRoleInvalid = 3005,
    UserCreationFailed = 3006,
    UserUpdateFailed = 3007,
    UserDeleteFailed = 3008,
    CanNotDeleteLastAdmin = 3009,

    // 课程
    CourseNotFound = 4000,
    CourseCodeAlreadyExists = 4001,
    CourseCodeInvalid = 4002,
    CourseHasDependents = 4003,
    CourseCreationFailed = 4004,
    CourseUpdateFailed = 4005,
    CourseDeleteFailed = 4006,
    ProfessorInvalid = 4007,
    CoursePermissionDenied = 4008,

    // 选课
    EnrollmentNotFound = 5000,
    AlreadyEnrolled = 5001,
    NotEnrolled = 5002,
    EnrollmentStudentInvalid = 5003,
    EnrollmentFailed = 5004,

    // 作业
    AssignmentNotFound = 6000,
    AssignmentDueDateInvalid = 6001,
    AssignmentCreationFailed = 6002,

    // 提交与评分
    SubmissionNotFound = 7000,
    SubmissionAlreadyExists = 7001,
    SubmissionDeadlinePassed = 7002,
    SubmissionAlreadyGraded = 7003,
    GradeOutOfRange = 7004,
    SubmissionFailed = 7005,
    GradeFailed = 7006,

    // 公告
    AnnouncementCreationFailed = 8000,

    // 区块链
    BlockchainUnavailable = 9000,
    TransactionNotFound = 9001,
    WalletNotFound = 9002,
}
