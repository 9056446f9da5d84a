use serde::Serialize;
use ts_rs::TS;

use crate::models::announcements::entities::AnnouncementDetail;
use crate::models::submissions::entities::SubmissionDetail;

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct UserCounts {
    pub total: i64,
    pub students: i64,
    pub professors: i64,
    pub admins: i64,
    pub active: i64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct CourseCounts {
    pub total: i64,
    pub assigned: i64,
    pub unassigned: i64,
    pub enrollments: i64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct AssignmentCounts {
    pub total: i64,
    pub overdue: i64,
}

#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SubmissionCounts {
    pub total: i64,
    pub graded: i64,
    pub pending: i64,
}

// 管理员总览
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemOverview {
    pub users: UserCounts,
    pub courses: CourseCounts,
    pub assignments: AssignmentCounts,
    pub submissions: SubmissionCounts,
    pub recent_announcements: Vec<AnnouncementDetail>,
    pub recent_submissions: Vec<SubmissionDetail>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
