//! 管理员总览统计

use super::SeaOrmStorage;
use crate::entity::announcements::{Column as AnnouncementColumn, Entity as Announcements};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::course_enrollments::Entity as CourseEnrollments;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{EduChainError, Result};
use crate::models::{
    submissions::entities::SubmissionStatus,
    system::responses::{
        AssignmentCounts, CourseCounts, SubmissionCounts, SystemOverview, UserCounts,
    },
    users::entities::{UserRole, UserStatus},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

const RECENT_ANNOUNCEMENTS: u64 = 5;
const RECENT_SUBMISSIONS: u64 = 10;

fn count_err(e: sea_orm::DbErr) -> EduChainError {
    EduChainError::database_operation(format!("统计失败: {e}"))
}

impl SeaOrmStorage {
    pub async fn system_overview_impl(&self) -> Result<SystemOverview> {
        let now = chrono::Utc::now();

        let users = UserCounts {
            total: self.count_users_impl().await? as i64,
            students: self.count_users_by_role_impl(UserRole::Student).await? as i64,
            professors: self.count_users_by_role_impl(UserRole::Professor).await? as i64,
            admins: self.count_users_by_role_impl(UserRole::Admin).await? as i64,
            active: Users::find()
                .filter(UserColumn::Status.eq(UserStatus::Active.to_string()))
                .count(&self.db)
                .await
                .map_err(count_err)? as i64,
        };

        let total_courses = Courses::find().count(&self.db).await.map_err(count_err)? as i64;
        let assigned = Courses::find()
            .filter(CourseColumn::ProfessorId.is_not_null())
            .count(&self.db)
            .await
            .map_err(count_err)? as i64;
        let courses = CourseCounts {
            total: total_courses,
            assigned,
            unassigned: total_courses - assigned,
            enrollments: CourseEnrollments::find()
                .count(&self.db)
                .await
                .map_err(count_err)? as i64,
        };

        let assignments = AssignmentCounts {
            total: Assignments::find().count(&self.db).await.map_err(count_err)? as i64,
            overdue: Assignments::find()
                .filter(AssignmentColumn::DueDate.lt(now.timestamp()))
                .count(&self.db)
                .await
                .map_err(count_err)? as i64,
        };

        let total_submissions = Submissions::find().count(&self.db).await.map_err(count_err)? as i64;
        let graded = Submissions::find()
            .filter(SubmissionColumn::Status.eq(SubmissionStatus::Graded.to_string()))
            .count(&self.db)
            .await
            .map_err(count_err)? as i64;
        let submissions = SubmissionCounts {
            total: total_submissions,
            graded,
            pending: total_submissions - graded,
        };

        let announcement_models = Announcements::find()
            .order_by_desc(AnnouncementColumn::CreatedAt)
            .order_by_desc(AnnouncementColumn::Id)
            .limit(RECENT_ANNOUNCEMENTS)
            .all(&self.db)
            .await
            .map_err(count_err)?;
        let submission_models = Submissions::find()
            .order_by_desc(SubmissionColumn::SubmittedAt)
            .order_by_desc(SubmissionColumn::Id)
            .limit(RECENT_SUBMISSIONS)
            .all(&self.db)
            .await
            .map_err(count_err)?;

        Ok(SystemOverview {
            users,
            courses,
            assignments,
            submissions,
            recent_announcements: self.announcement_details(announcement_models).await?,
            recent_submissions: self.submission_details(submission_models).await?,
            generated_at: now,
        })
    }
}
