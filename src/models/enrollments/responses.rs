use super::entities::{Enrollment, EnrollmentDetail};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentStats {
    pub total_enrollments: i64,
    pub unique_students: i64,
    pub unique_courses: i64,
}

// 选课列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentDetail>,
    pub pagination: PaginationInfo,
    pub stats: EnrollmentStats,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct SkippedEnrollment {
    pub student_id: i64,
    pub reason: String,
}

// 批量选课结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct BulkEnrollmentResponse {
    pub course_id: i64,
    pub created_count: i64,
    pub skipped_count: i64,
    pub created: Vec<Enrollment>,
    pub skipped: Vec<SkippedEnrollment>,
}
