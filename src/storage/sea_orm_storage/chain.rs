//! 已镜像上链的记录查询，用于链上动态

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{Column, Entity as Submissions};
use crate::errors::{EduChainError, Result};
use crate::models::{
    blockchain::entities::MirroredAssignment, submissions::entities::SubmissionDetail,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

impl SeaOrmStorage {
    /// 教师已上链的作业，最新的在前
    pub async fn list_mirrored_assignments_impl(
        &self,
        professor_id: i64,
        limit: u64,
    ) -> Result<Vec<MirroredAssignment>> {
        let models = Assignments::find()
            .filter(AssignmentColumn::ProfessorId.eq(professor_id))
            .filter(AssignmentColumn::ChainTxHash.is_not_null())
            .order_by_desc(AssignmentColumn::CreatedAt)
            .order_by_desc(AssignmentColumn::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询链上作业失败: {e}")))?;

        let courses = self
            .courses_by_id(models.iter().map(|m| m.course_id).collect())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let course_name = courses
                    .get(&m.course_id)
                    .map(|c| c.course_name.clone())
                    .unwrap_or_default();
                MirroredAssignment {
                    assignment: m.into_assignment(),
                    course_name,
                }
            })
            .collect())
    }

    /// 教师已上链发布的成绩，按评分时间倒序
    pub async fn list_published_results_impl(
        &self,
        professor_id: i64,
        limit: u64,
    ) -> Result<Vec<SubmissionDetail>> {
        let assignment_ids = self.professor_assignment_ids(professor_id).await?;
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Submissions::find()
            .filter(Column::AssignmentId.is_in(assignment_ids))
            .filter(Column::ChainResultHash.is_not_null())
            .order_by_desc(Column::GradedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询链上成绩失败: {e}")))?;

        self.submission_details(models).await
    }

    /// 学生已上链的提交，最新的在前
    pub async fn list_mirrored_submissions_impl(
        &self,
        student_id: i64,
        limit: u64,
    ) -> Result<Vec<SubmissionDetail>> {
        let models = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ChainTxHash.is_not_null())
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| EduChainError::database_operation(format!("查询链上提交失败: {e}")))?;

        self.submission_details(models).await
    }
}
